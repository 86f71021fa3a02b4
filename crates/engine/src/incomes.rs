//! Incomes planned or received within a budget.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError,
    validation::{IssueKind, ValidationError},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStatus {
    #[default]
    Planned,
    Completed,
}

impl IncomeStatus {
    pub const ALL: [Self; 2] = [Self::Planned, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Completed => "completed",
        }
    }

    /// An income is completed once paid; it can be reopened to `planned`.
    pub fn can_transition_to(self, next: Self) -> bool {
        self != next
    }
}

impl TryFrom<&str> for IncomeStatus {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| {
                ValidationError::single(
                    "status",
                    IssueKind::InvalidEnum,
                    format!("invalid income status '{value}', expected planned or completed"),
                )
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: IncomeStatus,
    /// Currency string, e.g. `"1000.00"`.
    pub planned_amount: String,
    pub actual_amount: Option<String>,
    pub planned_pay_date: DateTime<Utc>,
    pub actual_pay_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub budget_id: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub planned_amount: String,
    pub actual_amount: Option<String>,
    pub planned_pay_date: DateTimeUtc,
    pub actual_pay_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
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
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Income> for ActiveModel {
    fn from(value: &Income) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            planned_amount: ActiveValue::Set(value.planned_amount.clone()),
            actual_amount: ActiveValue::Set(value.actual_amount.clone()),
            planned_pay_date: ActiveValue::Set(value.planned_pay_date),
            actual_pay_date: ActiveValue::Set(value.actual_pay_date),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
            completed_at: ActiveValue::Set(value.completed_at),
            budget_id: ActiveValue::Set(value.budget_id.clone()),
        }
    }
}

impl TryFrom<Model> for Income {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = IncomeStatus::try_from(model.status.as_str())
            .map_err(|err| DbErr::Type(format!("income {}: {err}", model.id)))?;
        Ok(Self {
            id: model.id,
            name: model.name,
            description: model.description,
            status,
            planned_amount: model.planned_amount,
            actual_amount: model.actual_amount,
            planned_pay_date: model.planned_pay_date,
            actual_pay_date: model.actual_pay_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
            completed_at: model.completed_at,
            budget_id: model.budget_id,
        })
    }
}
