//! Validation schemas for insert, update and status-transition payloads.
//!
//! Each schema checks a whole payload and reports every rejected field at
//! once. Nothing is written when a schema fails.

use std::{fmt, sync::LazyLock};

use api_types::{
    DateInput, Scalar,
    budget::{BudgetNew, BudgetUpdate},
    category::{CategoryNew, CategoryUpdate},
    expense::{ExpenseNew, ExpenseUpdate},
    income::{IncomeNew, IncomeUpdate},
};
use regex::Regex;
use thiserror::Error;

use crate::{ExpenseStatus, IncomeStatus, coerce};

static CURRENCY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d+(\.\d{2})?$").ok());

const CURRENCY_MESSAGE: &str = "Value must be a valid currency string (e.g. '100.00')";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    WrongType,
    Pattern,
    InvalidEnum,
    InvalidDate,
    InvalidValue,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::WrongType => "wrong_type",
            Self::Pattern => "pattern",
            Self::InvalidEnum => "invalid_enum",
            Self::InvalidDate => "invalid_date",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// A rejected field, named as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("invalid payload: {}", summary(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn summary(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub(crate) fn single(field: &str, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                field: field.to_string(),
                kind,
                message: message.into(),
            }],
        }
    }

    /// Whether `field` was rejected with `kind`.
    pub fn has(&self, field: &str, kind: IssueKind) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.field == field && issue.kind == kind)
    }
}

#[derive(Default)]
struct Checker {
    issues: Vec<FieldIssue>,
}

impl Checker {
    fn push(&mut self, field: &str, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            kind,
            message: message.into(),
        });
    }

    fn missing(&mut self, field: &str) {
        self.push(field, IssueKind::Missing, "required field is missing");
    }

    fn text(&mut self, field: &str, value: Option<&str>) {
        if value.is_some_and(|v| v.trim().is_empty()) {
            self.push(field, IssueKind::InvalidValue, "must not be empty");
        }
    }

    fn required_text(&mut self, field: &str, value: Option<&str>) {
        match value {
            None => self.missing(field),
            some => self.text(field, some),
        }
    }

    fn amount(&mut self, field: &str, value: Option<&Scalar>) {
        match value {
            None => {}
            Some(Scalar::Bool(_)) => {
                self.push(field, IssueKind::WrongType, "expected a currency string")
            }
            Some(scalar) => {
                let text = coerce::string_or(Some(scalar), "");
                if !CURRENCY.as_ref().is_some_and(|re| re.is_match(&text)) {
                    self.push(field, IssueKind::Pattern, CURRENCY_MESSAGE);
                }
            }
        }
    }

    /// Amount of a cancelled expense: any spelling of zero, no currency pattern.
    fn zero_amount(&mut self, field: &str, value: Option<&Scalar>) {
        match value {
            None => {}
            Some(Scalar::Bool(_)) => {
                self.push(field, IssueKind::WrongType, "expected a currency string")
            }
            Some(amount) if coerce::number_or(Some(amount), f64::NAN) != 0.0 => self.push(
                field,
                IssueKind::InvalidValue,
                "actualAmount must be 0 for a cancelled expense",
            ),
            Some(_) => {}
        }
    }

    fn required_amount(&mut self, field: &str, value: Option<&Scalar>) {
        match value {
            None => self.missing(field),
            some => self.amount(field, some),
        }
    }

    fn date(&mut self, field: &str, value: Option<&DateInput>) {
        match value {
            Some(DateInput::Text(text)) if coerce::parse_date(text).is_none() => {
                self.push(field, IssueKind::InvalidDate, format!("invalid date: {text}"))
            }
            Some(DateInput::Millis(millis))
                if chrono::DateTime::from_timestamp_millis(*millis).is_none() =>
            {
                self.push(field, IssueKind::InvalidDate, "timestamp out of range")
            }
            _ => {}
        }
    }

    fn required_date(&mut self, field: &str, value: Option<&DateInput>) {
        match value {
            None => self.missing(field),
            some => self.date(field, some),
        }
    }

    /// Record an enum mismatch and return the parsed value.
    fn status<S>(&mut self, value: Option<&str>) -> Option<S>
    where
        S: for<'a> TryFrom<&'a str, Error = ValidationError>,
    {
        match value.map(S::try_from) {
            Some(Ok(status)) => Some(status),
            Some(Err(err)) => {
                self.issues.extend(err.issues);
                None
            }
            None => None,
        }
    }

    fn date_order(&mut self, start: Option<&DateInput>, end: Option<&DateInput>) {
        let start = coerce::nullable_date(start);
        let end = coerce::nullable_date(end);
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            self.push("endDate", IssueKind::InvalidValue, "endDate precedes startDate");
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}

pub fn budget_insert(input: &BudgetNew) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    check.text("id", input.id.as_deref());
    check.required_text("name", input.name.as_deref());
    check.date("startDate", input.start_date.as_ref());
    check.date("endDate", input.end_date.as_ref());
    check.date_order(input.start_date.as_ref(), input.end_date.as_ref());
    check.finish()
}

pub fn budget_update(input: &BudgetUpdate) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    check.text("name", input.name.as_deref());
    check.date("startDate", input.start_date.as_ref());
    check.date("endDate", input.end_date.as_ref());
    check.date_order(input.start_date.as_ref(), input.end_date.as_ref());
    check.finish()
}

pub fn category_insert(input: &CategoryNew) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    check.text("id", input.id.as_deref());
    check.required_text("name", input.name.as_deref());
    check.finish()
}

pub fn category_update(input: &CategoryUpdate) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    check.text("name", input.name.as_deref());
    check.finish()
}

pub fn income_insert(input: &IncomeNew) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    check.text("id", input.id.as_deref());
    check.required_text("name", input.name.as_deref());
    let status = check.status::<IncomeStatus>(input.status.as_deref());
    check.required_amount("plannedAmount", input.planned_amount.as_ref());
    check.amount("actualAmount", input.actual_amount.as_ref());
    check.required_date("plannedPayDate", input.planned_pay_date.as_ref());
    check.date("actualPayDate", input.actual_pay_date.as_ref());
    check.date("createdAt", input.created_at.as_ref());
    check.date("updatedAt", input.updated_at.as_ref());
    check.date("completedAt", input.completed_at.as_ref());
    check.required_text("budgetId", input.budget_id.as_deref());

    if let Some(status) = status
        && status != IncomeStatus::Planned
        && let Err(err) = income_transition(status, &income_patch(input))
    {
        check.issues.extend(err.issues);
    }
    check.finish()
}

pub fn income_update(input: &IncomeUpdate) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    check.text("name", input.name.as_deref());
    check.status::<IncomeStatus>(input.status.as_deref());
    check.amount("plannedAmount", input.planned_amount.as_ref());
    check.amount("actualAmount", input.actual_amount.as_ref().and_then(Option::as_ref));
    check.date("plannedPayDate", input.planned_pay_date.as_ref());
    check.date(
        "actualPayDate",
        input.actual_pay_date.as_ref().and_then(Option::as_ref),
    );
    check.date("completedAt", input.completed_at.as_ref().and_then(Option::as_ref));
    check.text("budgetId", input.budget_id.as_deref());
    check.finish()
}

/// Companion fields required to move an income into `target`.
///
/// - `completed`: `completedAt`, `actualAmount` and `actualPayDate`.
/// - `planned`: `plannedAmount` and `plannedPayDate`.
pub fn income_transition(target: IncomeStatus, input: &IncomeUpdate) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    match target {
        IncomeStatus::Completed => {
            check.required_date("completedAt", input.completed_at.as_ref().and_then(Option::as_ref));
            check.required_amount(
                "actualAmount",
                input.actual_amount.as_ref().and_then(Option::as_ref),
            );
            check.required_date(
                "actualPayDate",
                input.actual_pay_date.as_ref().and_then(Option::as_ref),
            );
        }
        IncomeStatus::Planned => {
            check.required_amount("plannedAmount", input.planned_amount.as_ref());
            check.required_date("plannedPayDate", input.planned_pay_date.as_ref());
        }
    }
    check.finish()
}

pub fn expense_insert(input: &ExpenseNew) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    check.text("id", input.id.as_deref());
    check.required_text("name", input.name.as_deref());
    let status = check.status::<ExpenseStatus>(input.status.as_deref());
    check.required_amount("plannedAmount", input.planned_amount.as_ref());
    // The cancelled transition below checks this amount itself.
    if status != Some(ExpenseStatus::Cancelled) {
        check.amount("actualAmount", input.actual_amount.as_ref());
    }
    check.date("dueDate", input.due_date.as_ref());
    check.date("createdAt", input.created_at.as_ref());
    check.date("updatedAt", input.updated_at.as_ref());
    check.date("initiationDate", input.initiation_date.as_ref());
    check.date("completionDate", input.completion_date.as_ref());
    check.date("cancelationDate", input.cancelation_date.as_ref());
    check.required_text("budgetId", input.budget_id.as_deref());

    if let Some(status) = status
        && status != ExpenseStatus::Planned
        && let Err(err) = expense_transition(status, &expense_patch(input))
    {
        check.issues.extend(err.issues);
    }
    check.finish()
}

pub fn expense_update(input: &ExpenseUpdate) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    check.text("name", input.name.as_deref());
    let status = check.status::<ExpenseStatus>(input.status.as_deref());
    check.amount("plannedAmount", input.planned_amount.as_ref());
    let actual_amount = input.actual_amount.as_ref().and_then(Option::as_ref);
    if status == Some(ExpenseStatus::Cancelled) {
        check.zero_amount("actualAmount", actual_amount);
    } else {
        check.amount("actualAmount", actual_amount);
    }
    check.date("dueDate", input.due_date.as_ref());
    check.date(
        "initiationDate",
        input.initiation_date.as_ref().and_then(Option::as_ref),
    );
    check.date(
        "completionDate",
        input.completion_date.as_ref().and_then(Option::as_ref),
    );
    check.date(
        "cancelationDate",
        input.cancelation_date.as_ref().and_then(Option::as_ref),
    );
    check.text("budgetId", input.budget_id.as_deref());
    check.finish()
}

/// Companion fields required to move an expense into `target`.
///
/// - `initiated`: `initiationDate` and `actualAmount`.
/// - `completed`: `completionDate` and `actualAmount`.
/// - `cancelled`: `cancelationDate` and an `actualAmount` equal to 0.
/// - `planned`, `failed`: nothing.
pub fn expense_transition(
    target: ExpenseStatus,
    input: &ExpenseUpdate,
) -> Result<(), ValidationError> {
    let mut check = Checker::default();
    let actual_amount = input.actual_amount.as_ref().and_then(Option::as_ref);
    match target {
        ExpenseStatus::Initiated => {
            check.required_date(
                "initiationDate",
                input.initiation_date.as_ref().and_then(Option::as_ref),
            );
            check.required_amount("actualAmount", actual_amount);
        }
        ExpenseStatus::Completed => {
            check.required_date(
                "completionDate",
                input.completion_date.as_ref().and_then(Option::as_ref),
            );
            check.required_amount("actualAmount", actual_amount);
        }
        ExpenseStatus::Cancelled => {
            check.required_date(
                "cancelationDate",
                input.cancelation_date.as_ref().and_then(Option::as_ref),
            );
            match actual_amount {
                None => check.missing("actualAmount"),
                some => check.zero_amount("actualAmount", some),
            }
        }
        ExpenseStatus::Planned | ExpenseStatus::Failed => {}
    }
    check.finish()
}

fn income_patch(input: &IncomeNew) -> IncomeUpdate {
    IncomeUpdate {
        name: input.name.clone(),
        description: input.description.clone().map(Some),
        status: input.status.clone(),
        planned_amount: input.planned_amount.clone(),
        actual_amount: input.actual_amount.clone().map(Some),
        planned_pay_date: input.planned_pay_date.clone(),
        actual_pay_date: input.actual_pay_date.clone().map(Some),
        completed_at: input.completed_at.clone().map(Some),
        budget_id: input.budget_id.clone(),
    }
}

fn expense_patch(input: &ExpenseNew) -> ExpenseUpdate {
    ExpenseUpdate {
        name: input.name.clone(),
        description: input.description.clone().map(Some),
        status: input.status.clone(),
        planned_amount: input.planned_amount.clone(),
        actual_amount: input.actual_amount.clone().map(Some),
        due_date: input.due_date.clone(),
        initiation_date: input.initiation_date.clone().map(Some),
        completion_date: input.completion_date.clone().map(Some),
        cancelation_date: input.cancelation_date.clone().map(Some),
        budget_id: input.budget_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn income() -> IncomeNew {
        IncomeNew {
            name: Some("Salary".to_string()),
            planned_amount: Some(Scalar::from("1000.00")),
            planned_pay_date: Some(DateInput::from("2024-05-27T00:00:00Z")),
            budget_id: Some("B1".to_string()),
            ..Default::default()
        }
    }

    fn expense() -> ExpenseNew {
        ExpenseNew {
            name: Some("Rent".to_string()),
            planned_amount: Some(Scalar::from("750.00")),
            budget_id: Some("B1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn budget_requires_a_name() {
        let err = budget_insert(&BudgetNew::default()).unwrap_err();
        assert!(err.has("name", IssueKind::Missing));

        let named = BudgetNew {
            name: Some("B1".to_string()),
            ..Default::default()
        };
        assert!(budget_insert(&named).is_ok());
    }

    #[test]
    fn budget_rejects_unreadable_and_reversed_dates() {
        let input = BudgetNew {
            name: Some("B1".to_string()),
            start_date: Some(DateInput::from("first of may")),
            ..Default::default()
        };
        assert!(budget_insert(&input).unwrap_err().has("startDate", IssueKind::InvalidDate));

        let reversed = BudgetUpdate {
            start_date: Some(DateInput::from("2024-05-31")),
            end_date: Some(DateInput::from("2024-05-01")),
            ..Default::default()
        };
        assert!(budget_update(&reversed).unwrap_err().has("endDate", IssueKind::InvalidValue));
    }

    #[test]
    fn amounts_follow_currency_pattern() {
        for ok in ["1000", "1000.00", "0.50"] {
            let input = IncomeNew {
                planned_amount: Some(Scalar::from(ok)),
                ..income()
            };
            assert!(income_insert(&input).is_ok(), "{ok} should be accepted");
        }
        for bad in ["10.5", "1,000.00", "-3.00", "abc", "10.005"] {
            let input = IncomeNew {
                planned_amount: Some(Scalar::from(bad)),
                ..income()
            };
            let err = income_insert(&input).unwrap_err();
            assert!(err.has("plannedAmount", IssueKind::Pattern), "{bad} should fail");
        }
    }

    #[test]
    fn numeric_amounts_are_coerced_before_matching() {
        let input = IncomeNew {
            planned_amount: Some(Scalar::from(1000)),
            ..income()
        };
        assert!(income_insert(&input).is_ok());

        let input = IncomeNew {
            planned_amount: Some(Scalar::Bool(true)),
            ..income()
        };
        assert!(income_insert(&input).unwrap_err().has("plannedAmount", IssueKind::WrongType));
    }

    #[test]
    fn every_failing_field_is_reported() {
        let input = IncomeNew {
            status: Some("paid".to_string()),
            planned_amount: Some(Scalar::from("1.2")),
            ..Default::default()
        };
        let err = income_insert(&input).unwrap_err();
        assert!(err.has("name", IssueKind::Missing));
        assert!(err.has("status", IssueKind::InvalidEnum));
        assert!(err.has("plannedAmount", IssueKind::Pattern));
        assert!(err.has("plannedPayDate", IssueKind::Missing));
        assert!(err.has("budgetId", IssueKind::Missing));
    }

    #[test]
    fn completed_income_needs_companions() {
        let err = income_transition(IncomeStatus::Completed, &IncomeUpdate::default()).unwrap_err();
        assert!(err.has("completedAt", IssueKind::Missing));
        assert!(err.has("actualAmount", IssueKind::Missing));
        assert!(err.has("actualPayDate", IssueKind::Missing));

        let input = IncomeNew {
            status: Some("completed".to_string()),
            ..income()
        };
        assert!(income_insert(&input).unwrap_err().has("completedAt", IssueKind::Missing));
    }

    #[test]
    fn cancelled_expense_needs_zero_actual_amount() {
        let patch = ExpenseUpdate {
            status: Some("cancelled".to_string()),
            cancelation_date: Some(Some(DateInput::from("2024-05-02"))),
            actual_amount: Some(Some(Scalar::from("12.00"))),
            ..Default::default()
        };
        let err = expense_transition(ExpenseStatus::Cancelled, &patch).unwrap_err();
        assert!(err.has("actualAmount", IssueKind::InvalidValue));

        for zero in [Scalar::from("0"), Scalar::from("0.00"), Scalar::from(0)] {
            let patch = ExpenseUpdate {
                actual_amount: Some(Some(zero)),
                ..patch.clone()
            };
            assert!(expense_transition(ExpenseStatus::Cancelled, &patch).is_ok());
        }
    }

    #[test]
    fn cancelled_expense_insert_with_nonzero_amount_is_rejected() {
        let input = ExpenseNew {
            status: Some("cancelled".to_string()),
            cancelation_date: Some(DateInput::from("2024-05-02")),
            actual_amount: Some(Scalar::from("5.00")),
            ..expense()
        };
        assert!(expense_insert(&input).unwrap_err().has("actualAmount", IssueKind::InvalidValue));
    }

    #[test]
    fn cancelled_expense_accepts_zero_outside_currency_pattern() {
        let input = ExpenseNew {
            status: Some("cancelled".to_string()),
            cancelation_date: Some(DateInput::from("2024-05-02")),
            actual_amount: Some(Scalar::from("0.0")),
            ..expense()
        };
        assert!(expense_insert(&input).is_ok());

        let patch = expense_patch(&input);
        assert!(expense_update(&patch).is_ok());
        assert!(expense_transition(ExpenseStatus::Cancelled, &patch).is_ok());

        let patch = ExpenseUpdate {
            actual_amount: Some(Some(Scalar::from("abc"))),
            ..patch
        };
        assert!(expense_update(&patch).unwrap_err().has("actualAmount", IssueKind::InvalidValue));

        let uncancelled = ExpenseUpdate {
            actual_amount: Some(Some(Scalar::from("0.0"))),
            ..Default::default()
        };
        assert!(expense_update(&uncancelled).unwrap_err().has("actualAmount", IssueKind::Pattern));
    }

    #[test]
    fn currency_pattern_compiles() {
        assert!(CURRENCY.is_some());
    }

    #[test]
    fn initiated_and_completed_expenses_need_dates_and_amounts() {
        let err = expense_transition(ExpenseStatus::Initiated, &ExpenseUpdate::default()).unwrap_err();
        assert!(err.has("initiationDate", IssueKind::Missing));
        assert!(err.has("actualAmount", IssueKind::Missing));

        let err = expense_transition(ExpenseStatus::Completed, &ExpenseUpdate::default()).unwrap_err();
        assert!(err.has("completionDate", IssueKind::Missing));

        assert!(expense_transition(ExpenseStatus::Failed, &ExpenseUpdate::default()).is_ok());
    }

    #[test]
    fn update_schemas_accept_empty_patches() {
        assert!(budget_update(&BudgetUpdate::default()).is_ok());
        assert!(income_update(&IncomeUpdate::default()).is_ok());
        assert!(expense_update(&ExpenseUpdate::default()).is_ok());
        assert!(category_update(&CategoryUpdate::default()).is_ok());
    }

    #[test]
    fn blank_names_are_rejected() {
        let err = category_insert(&CategoryNew {
            name: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.has("name", IssueKind::InvalidValue));
        assert!(expense_insert(&expense()).is_ok());
    }
}
