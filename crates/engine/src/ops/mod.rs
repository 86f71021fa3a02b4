use sea_orm::{DatabaseConnection, DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine};

mod budgets;
mod categories;
mod expenses;
mod incomes;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point for every bookkeeping operation.
///
/// The engine owns nothing but the database handle it was built with, so
/// tests and binaries can hand it whichever connection they need.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    async fn require_budget(
        &self,
        db_tx: &DatabaseTransaction,
        budget_id: &str,
    ) -> ResultEngine<crate::budgets::Model> {
        crate::budgets::Entity::find_by_id(budget_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::not_found("Budget", budget_id))
    }

    async fn require_income(
        &self,
        db_tx: &DatabaseTransaction,
        income_id: &str,
    ) -> ResultEngine<crate::incomes::Model> {
        crate::incomes::Entity::find_by_id(income_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::not_found("Income", income_id))
    }

    async fn require_expense(
        &self,
        db_tx: &DatabaseTransaction,
        expense_id: &str,
    ) -> ResultEngine<crate::expenses::Model> {
        crate::expenses::Entity::find_by_id(expense_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::not_found("Expense", expense_id))
    }

    async fn require_category(
        &self,
        db_tx: &DatabaseTransaction,
        category_id: &str,
    ) -> ResultEngine<crate::categories::Model> {
        crate::categories::Entity::find_by_id(category_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::not_found("Category", category_id))
    }
}

fn normalize_required_name(value: &str) -> String {
    value.trim().to_string()
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
