//! Expenses planned or paid within a budget, taggable with categories.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError,
    validation::{IssueKind, ValidationError},
};

/// Lifecycle of an expense.
///
/// ```text
/// planned -> initiated -> completed
/// planned -> cancelled
/// planned | initiated -> failed
/// ```
///
/// `completed`, `cancelled` and `failed` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    #[default]
    Planned,
    Initiated,
    Completed,
    Cancelled,
    Failed,
}

impl ExpenseStatus {
    pub const ALL: [Self; 5] = [
        Self::Planned,
        Self::Initiated,
        Self::Completed,
        Self::Cancelled,
        Self::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Initiated => "initiated",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Planned, Self::Initiated)
                | (Self::Initiated, Self::Completed)
                | (Self::Planned, Self::Cancelled)
                | (Self::Planned | Self::Initiated, Self::Failed)
        )
    }
}

impl TryFrom<&str> for ExpenseStatus {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| {
                ValidationError::single(
                    "status",
                    IssueKind::InvalidEnum,
                    format!(
                        "invalid expense status '{value}', expected one of planned, initiated, completed, cancelled, failed"
                    ),
                )
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ExpenseStatus,
    pub planned_amount: String,
    pub actual_amount: Option<String>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub initiation_date: Option<DateTime<Utc>>,
    pub completion_date: Option<DateTime<Utc>>,
    pub cancelation_date: Option<DateTime<Utc>>,
    pub budget_id: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub planned_amount: String,
    pub actual_amount: Option<String>,
    pub due_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub initiation_date: Option<DateTimeUtc>,
    pub completion_date: Option<DateTimeUtc>,
    pub cancelation_date: Option<DateTimeUtc>,
    pub budget_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Budget,
    #[sea_orm(has_many = "super::expense_categories::Entity")]
    ExpenseCategories,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl Related<super::expense_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseCategories.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::expense_categories::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::expense_categories::Relation::Expense.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            planned_amount: ActiveValue::Set(value.planned_amount.clone()),
            actual_amount: ActiveValue::Set(value.actual_amount.clone()),
            due_date: ActiveValue::Set(value.due_date),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
            initiation_date: ActiveValue::Set(value.initiation_date),
            completion_date: ActiveValue::Set(value.completion_date),
            cancelation_date: ActiveValue::Set(value.cancelation_date),
            budget_id: ActiveValue::Set(value.budget_id.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = ExpenseStatus::try_from(model.status.as_str())
            .map_err(|err| DbErr::Type(format!("expense {}: {err}", model.id)))?;
        Ok(Self {
            id: model.id,
            name: model.name,
            description: model.description,
            status,
            planned_amount: model.planned_amount,
            actual_amount: model.actual_amount,
            due_date: model.due_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
            initiation_date: model.initiation_date,
            completion_date: model.completion_date,
            cancelation_date: model.cancelation_date,
            budget_id: model.budget_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ExpenseStatus::*;
    use super::*;

    #[test]
    fn allowed_transitions() {
        assert!(Planned.can_transition_to(Initiated));
        assert!(Initiated.can_transition_to(Completed));
        assert!(Planned.can_transition_to(Cancelled));
        assert!(Planned.can_transition_to(Failed));
        assert!(Initiated.can_transition_to(Failed));
    }

    #[test]
    fn terminal_states_do_not_move() {
        for from in [Completed, Cancelled, Failed] {
            assert!(from.is_terminal());
            for to in ExpenseStatus::ALL {
                assert!(!from.can_transition_to(to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn completion_requires_initiation() {
        assert!(!Planned.can_transition_to(Completed));
        assert!(!Initiated.can_transition_to(Cancelled));
        assert!(!Initiated.can_transition_to(Planned));
    }

    #[test]
    fn unknown_status_is_an_enum_mismatch() {
        let err = ExpenseStatus::try_from("paid").unwrap_err();
        assert!(err.has("status", IssueKind::InvalidEnum));
    }
}
