use api_types::expense::{ExpenseNew, ExpenseUpdate};
use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, EngineError, Expense, ExpenseCategory, ExpenseStatus, ResultEngine, categories,
    coerce, expense_categories, expenses, generate_id, validation,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    pub async fn expenses(&self) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    pub async fn expense(&self, expense_id: &str) -> ResultEngine<Option<Expense>> {
        expenses::Entity::find_by_id(expense_id.to_string())
            .one(&self.database)
            .await?
            .map(Expense::try_from)
            .transpose()
    }

    /// Create an expense inside an existing budget.
    ///
    /// `dueDate` defaults to now. A status other than `planned` must come
    /// with its companion fields.
    pub async fn create_expense(&self, input: ExpenseNew) -> ResultEngine<Expense> {
        validation::expense_insert(&input)?;

        let now = Utc::now();
        let status = match input.status.as_deref() {
            Some(status) => ExpenseStatus::try_from(status)?,
            None => ExpenseStatus::default(),
        };
        let expense = Expense {
            id: input.id.unwrap_or_else(generate_id),
            name: normalize_required_name(input.name.as_deref().unwrap_or_default()),
            description: normalize_optional_text(input.description.as_deref()),
            status,
            planned_amount: coerce::string_or(input.planned_amount.as_ref(), "0"),
            actual_amount: coerce::nullable_string(input.actual_amount.as_ref()),
            due_date: coerce::date_or(input.due_date.as_ref(), now),
            created_at: coerce::date_or(input.created_at.as_ref(), now),
            updated_at: coerce::date_or(input.updated_at.as_ref(), now),
            initiation_date: coerce::nullable_date(input.initiation_date.as_ref()),
            completion_date: coerce::nullable_date(input.completion_date.as_ref()),
            cancelation_date: coerce::nullable_date(input.cancelation_date.as_ref()),
            budget_id: input.budget_id.unwrap_or_default(),
        };

        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, &expense.budget_id).await?;
            let model = expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            Expense::try_from(model)
        })
    }

    /// Apply a partial update to an expense.
    ///
    /// A status change must be an edge of the expense lifecycle (see
    /// [`ExpenseStatus`]) and the patch must carry the companion fields of
    /// the target status. Fields set to `null` are cleared.
    pub async fn update_expense(
        &self,
        expense_id: &str,
        patch: ExpenseUpdate,
    ) -> ResultEngine<Expense> {
        validation::expense_update(&patch)?;

        with_tx!(self, |db_tx| {
            let model = self.require_expense(&db_tx, expense_id).await?;
            let current = Expense::try_from(model.clone())?;
            let mut active: expenses::ActiveModel = model.into();

            if let Some(next) = patch
                .status
                .as_deref()
                .map(ExpenseStatus::try_from)
                .transpose()?
                && next != current.status
            {
                if !current.status.can_transition_to(next) {
                    return Err(EngineError::InvalidTransition(format!(
                        "expense {} cannot move from {} to {}",
                        current.id,
                        current.status.as_str(),
                        next.as_str()
                    )));
                }
                validation::expense_transition(next, &patch)?;
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
            if let Some(due_date) = coerce::nullable_date(patch.due_date.as_ref()) {
                active.due_date = ActiveValue::Set(due_date);
            }
            if let Some(initiation_date) = &patch.initiation_date {
                active.initiation_date =
                    ActiveValue::Set(coerce::nullable_date(initiation_date.as_ref()));
            }
            if let Some(completion_date) = &patch.completion_date {
                active.completion_date =
                    ActiveValue::Set(coerce::nullable_date(completion_date.as_ref()));
            }
            if let Some(cancelation_date) = &patch.cancelation_date {
                active.cancelation_date =
                    ActiveValue::Set(coerce::nullable_date(cancelation_date.as_ref()));
            }

            if !active.is_changed() {
                Ok(current)
            } else {
                active.updated_at = ActiveValue::Set(Utc::now());
                let updated = active.update(&db_tx).await?;
                Expense::try_from(updated)
            }
        })
    }

    /// Delete an expense. Its category tags go with it.
    pub async fn delete_expense(&self, expense_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_expense(&db_tx, expense_id).await?;
            expenses::Entity::delete_by_id(expense_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Tag an expense with a category. Tagging twice keeps a single link.
    pub async fn tag_expense_with_category(
        &self,
        expense_id: &str,
        category_id: &str,
    ) -> ResultEngine<ExpenseCategory> {
        with_tx!(self, |db_tx| {
            self.require_expense(&db_tx, expense_id).await?;
            self.require_category(&db_tx, category_id).await?;

            let key = (expense_id.to_string(), category_id.to_string());
            let link = match expense_categories::Entity::find_by_id(key)
                .one(&db_tx)
                .await?
            {
                Some(existing) => existing,
                None => {
                    expense_categories::ActiveModel {
                        expense_id: ActiveValue::Set(expense_id.to_string()),
                        category_id: ActiveValue::Set(category_id.to_string()),
                    }
                    .insert(&db_tx)
                    .await?
                }
            };
            Ok(ExpenseCategory::from(link))
        })
    }

    /// Remove a category tag from an expense. Removing a tag that is not
    /// there is not an error.
    pub async fn untag_expense_from_category(
        &self,
        expense_id: &str,
        category_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_expense(&db_tx, expense_id).await?;
            expense_categories::Entity::delete_by_id((
                expense_id.to_string(),
                category_id.to_string(),
            ))
            .exec(&db_tx)
            .await?;
            Ok(())
        })
    }

    /// Categories an expense is tagged with, ordered by name.
    pub async fn expense_categories(&self, expense_id: &str) -> ResultEngine<Vec<Category>> {
        let expense = expenses::Entity::find_by_id(expense_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("Expense", expense_id))?;

        let models = expense
            .find_related(categories::Entity)
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }
}
