use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A loosely typed scalar.
///
/// Amount fields travel as currency strings (`"100.00"`) but clients are
/// allowed to send plain JSON numbers or booleans; the engine coerces them to
/// text before checking the currency pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// A date as sent by clients: either calendar text (RFC 3339 or
/// `YYYY-MM-DD[THH:MM:SS]`) or milliseconds since the Unix epoch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Millis(i64),
    Text(String),
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Text(value.to_rfc3339())
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Keep `null` distinct from an absent field: absent is `None`, `null` is
/// `Some(None)`. Use with `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub mod budget {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetNew {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<DateInput>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<DateInput>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetView {
        pub id: String,
        pub name: String,
        pub start_date: DateTime<Utc>,
        pub end_date: DateTime<Utc>,
    }

    /// A budget with the incomes and expenses it owns.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetDetail {
        #[serde(flatten)]
        pub budget: BudgetView,
        pub income: Vec<super::income::IncomeView>,
        pub expense: Vec<super::expense::ExpenseView>,
    }
}

pub mod income {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeNew {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<String>,
        pub planned_amount: Option<Scalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub actual_amount: Option<Scalar>,
        pub planned_pay_date: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub actual_pay_date: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub completed_at: Option<DateInput>,
        pub budget_id: Option<String>,
    }

    /// Partial update. Nullable columns accept an explicit `null` to clear
    /// them.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub planned_amount: Option<Scalar>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub actual_amount: Option<Option<Scalar>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub planned_pay_date: Option<DateInput>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub actual_pay_date: Option<Option<DateInput>>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub completed_at: Option<Option<DateInput>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub budget_id: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeView {
        pub id: String,
        pub name: String,
        pub description: Option<String>,
        pub status: String,
        pub planned_amount: String,
        pub actual_amount: Option<String>,
        pub planned_pay_date: DateTime<Utc>,
        pub actual_pay_date: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub completed_at: Option<DateTime<Utc>>,
        pub budget_id: String,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<String>,
        pub planned_amount: Option<Scalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub actual_amount: Option<Scalar>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub due_date: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub initiation_date: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub completion_date: Option<DateInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub cancelation_date: Option<DateInput>,
        pub budget_id: Option<String>,
    }

    /// Partial update. Setting `status` to a new value is a state
    /// transition and must carry the companion fields of the target state.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub planned_amount: Option<Scalar>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub actual_amount: Option<Option<Scalar>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub due_date: Option<DateInput>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub initiation_date: Option<Option<DateInput>>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub completion_date: Option<Option<DateInput>>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub cancelation_date: Option<Option<DateInput>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub budget_id: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: String,
        pub name: String,
        pub description: Option<String>,
        pub status: String,
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
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryNew {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(
            default,
            deserialize_with = "nullable",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: String,
        pub name: String,
        pub description: Option<String>,
    }
}

pub mod error {
    use super::*;

    /// One rejected field of a request payload.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct IssueView {
        pub field: String,
        /// One of `missing`, `wrong_type`, `pattern`, `invalid_enum`,
        /// `invalid_date`, `invalid_value`.
        pub kind: String,
        pub message: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub issues: Vec<IssueView>,
    }
}
