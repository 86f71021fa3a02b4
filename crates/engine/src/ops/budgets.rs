use api_types::budget::{BudgetNew, BudgetUpdate};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    Budget, BudgetDetail, Expense, Income, ResultEngine, budgets, coerce, expenses, generate_id,
    incomes, month_bounds,
    validation::{self, IssueKind, ValidationError},
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Return every budget, in storage order.
    pub async fn budgets(&self) -> ResultEngine<Vec<Budget>> {
        let models = budgets::Entity::find().all(&self.database).await?;
        Ok(models.into_iter().map(Budget::from).collect())
    }

    /// Return a budget with its incomes and expenses, or `None` if the id is
    /// unknown.
    pub async fn budget(&self, budget_id: &str) -> ResultEngine<Option<BudgetDetail>> {
        let Some(model) = budgets::Entity::find_by_id(budget_id.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };

        let income = model
            .find_related(incomes::Entity)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Income::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        let expense = model
            .find_related(expenses::Entity)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(Some(BudgetDetail {
            budget: Budget::from(model),
            income,
            expense,
        }))
    }

    /// Create a budget.
    ///
    /// Without `startDate`/`endDate` the budget spans the current calendar
    /// month.
    pub async fn create_budget(&self, input: BudgetNew) -> ResultEngine<Budget> {
        validation::budget_insert(&input)?;

        let (month_start, month_end) = month_bounds(Utc::now());
        let budget = Budget {
            id: input.id.unwrap_or_else(generate_id),
            name: normalize_required_name(input.name.as_deref().unwrap_or_default()),
            start_date: coerce::date_or(input.start_date.as_ref(), month_start),
            end_date: coerce::date_or(input.end_date.as_ref(), month_end),
        };
        check_date_order(budget.start_date, budget.end_date)?;

        let model = budgets::ActiveModel::from(&budget)
            .insert(&self.database)
            .await?;
        Ok(Budget::from(model))
    }

    /// Write the supplied fields of a budget and return the stored row.
    pub async fn update_budget(&self, budget_id: &str, patch: BudgetUpdate) -> ResultEngine<Budget> {
        validation::budget_update(&patch)?;

        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, budget_id).await?;
            let mut active: budgets::ActiveModel = model.clone().into();
            if let Some(name) = patch.name.as_deref() {
                active.name = ActiveValue::Set(normalize_required_name(name));
            }
            if patch.start_date.is_some() || patch.end_date.is_some() {
                let start_date = coerce::date_or(patch.start_date.as_ref(), model.start_date);
                let end_date = coerce::date_or(patch.end_date.as_ref(), model.end_date);
                check_date_order(start_date, end_date)?;
                if start_date != model.start_date {
                    active.start_date = ActiveValue::Set(start_date);
                }
                if end_date != model.end_date {
                    active.end_date = ActiveValue::Set(end_date);
                }
            }

            if !active.is_changed() {
                Ok(Budget::from(model))
            } else {
                let updated = active.update(&db_tx).await?;
                Ok(Budget::from(updated))
            }
        })
    }

    /// Delete a budget together with its incomes and expenses.
    pub async fn delete_budget(&self, budget_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, budget_id).await?;
            budgets::Entity::delete_by_id(budget_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}

/// Reject a resolved range that ends before it starts.
fn check_date_order(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::single(
            "endDate",
            IssueKind::InvalidValue,
            "endDate precedes startDate",
        ));
    }
    Ok(())
}
