use api_types::income::{IncomeNew, IncomeUpdate};
use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    EngineError, Income, IncomeStatus, ResultEngine, coerce, generate_id, incomes, validation,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    pub async fn incomes(&self) -> ResultEngine<Vec<Income>> {
        incomes::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Income::try_from)
            .collect()
    }

    pub async fn income(&self, income_id: &str) -> ResultEngine<Option<Income>> {
        incomes::Entity::find_by_id(income_id.to_string())
            .one(&self.database)
            .await?
            .map(Income::try_from)
            .transpose()
    }

    /// Create an income inside an existing budget.
    ///
    /// A status other than `planned` must come with its companion fields, as
    /// if the income had been moved there by an update.
    pub async fn create_income(&self, input: IncomeNew) -> ResultEngine<Income> {
        validation::income_insert(&input)?;

        let now = Utc::now();
        let status = match input.status.as_deref() {
            Some(status) => IncomeStatus::try_from(status)?,
            None => IncomeStatus::default(),
        };
        let income = Income {
            id: input.id.unwrap_or_else(generate_id),
            name: normalize_required_name(input.name.as_deref().unwrap_or_default()),
            description: normalize_optional_text(input.description.as_deref()),
            status,
            planned_amount: coerce::string_or(input.planned_amount.as_ref(), "0"),
            actual_amount: coerce::nullable_string(input.actual_amount.as_ref()),
            planned_pay_date: coerce::date_or(input.planned_pay_date.as_ref(), now),
            actual_pay_date: coerce::nullable_date(input.actual_pay_date.as_ref()),
            created_at: coerce::date_or(input.created_at.as_ref(), now),
            updated_at: coerce::date_or(input.updated_at.as_ref(), now),
            completed_at: coerce::nullable_date(input.completed_at.as_ref()),
            budget_id: input.budget_id.unwrap_or_default(),
        };

        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, &income.budget_id).await?;
            let model = incomes::ActiveModel::from(&income).insert(&db_tx).await?;
            Income::try_from(model)
        })
    }

    /// Apply a partial update to an income.
    ///
    /// Changing `status` must follow [`IncomeStatus::can_transition_to`] and
    /// the patch must carry the companion fields of the target status.
    /// Fields set to `null` are cleared.
    pub async fn update_income(&self, income_id: &str, patch: IncomeUpdate) -> ResultEngine<Income> {
        validation::income_update(&patch)?;

        with_tx!(self, |db_tx| {
            let model = self.require_income(&db_tx, income_id).await?;
            let current = Income::try_from(model.clone())?;
            let mut active: incomes::ActiveModel = model.into();

            if let Some(next) = patch.status.as_deref().map(IncomeStatus::try_from).transpose()?
                && next != current.status
            {
                if !current.status.can_transition_to(next) {
                    return Err(EngineError::InvalidTransition(format!(
                        "income {} cannot move from {} to {}",
                        current.id,
                        current.status.as_str(),
                        next.as_str()
                    )));
                }
                validation::income_transition(next, &patch)?;
                active.status = ActiveValue::Set(next.as_str().to_string());
            }

            if let Some(budget_id) = patch.budget_id.as_deref()
                && budget_id != current.budget_id
            {
                self.require_budget(&db_tx, budget_id).await?;
                active.budget_id = ActiveValue::Set(budget_id.to_string());
            }
            if let Some(name) = patch.name.as_deref() {
                active.name = ActiveValue::Set(normalize_required_name(name));
            }
            if let Some(description) = &patch.description {
                active.description = ActiveValue::Set(normalize_optional_text(description.as_deref()));
            }
            if let Some(planned_amount) = &patch.planned_amount {
                active.planned_amount =
                    ActiveValue::Set(coerce::string_or(Some(planned_amount), "0"));
            }
            if let Some(actual_amount) = &patch.actual_amount {
                active.actual_amount =
                    ActiveValue::Set(coerce::nullable_string(actual_amount.as_ref()));
            }
            if let Some(planned_pay_date) =
                coerce::nullable_date(patch.planned_pay_date.as_ref())
            {
                active.planned_pay_date = ActiveValue::Set(planned_pay_date);
            }
            if let Some(actual_pay_date) = &patch.actual_pay_date {
                active.actual_pay_date =
                    ActiveValue::Set(coerce::nullable_date(actual_pay_date.as_ref()));
            }
            if let Some(completed_at) = &patch.completed_at {
                active.completed_at = ActiveValue::Set(coerce::nullable_date(completed_at.as_ref()));
            }

            if !active.is_changed() {
                Ok(current)
            } else {
                active.updated_at = ActiveValue::Set(Utc::now());
                let updated = active.update(&db_tx).await?;
                Income::try_from(updated)
            }
        })
    }

    pub async fn delete_income(&self, income_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_income(&db_tx, income_id).await?;
            incomes::Entity::delete_by_id(income_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
