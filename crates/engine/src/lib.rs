//! Bookkeeping engine: budgets, incomes, expenses and categories stored
//! through sea-orm.
//!
//! Every write goes through a validation schema (see [`validation`]) before
//! it reaches the database. Defaults for absent fields are resolved with the
//! helpers in [`coerce`].

pub use budgets::{Budget, BudgetDetail, month_bounds};
pub use categories::Category;
pub use error::EngineError;
pub use expense_categories::ExpenseCategory;
pub use expenses::{Expense, ExpenseStatus};
pub use ids::generate_id;
pub use incomes::{Income, IncomeStatus};
pub use ops::Engine;
pub use validation::{FieldIssue, IssueKind, ValidationError};

pub mod coerce;
pub mod validation;

mod budgets;
mod categories;
mod error;
mod expense_categories;
mod expenses;
mod ids;
mod incomes;
mod ops;

type ResultEngine<T> = Result<T, EngineError>;
