#![allow(dead_code)]

use api_types::{
    DateInput, Scalar, budget::BudgetNew, category::CategoryNew, expense::ExpenseNew,
    income::IncomeNew,
};
use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};

use engine::{Budget, Engine};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn budget(engine: &Engine, name: &str) -> Budget {
    engine
        .create_budget(BudgetNew {
            name: Some(name.to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
}

pub fn salary(budget_id: &str) -> IncomeNew {
    IncomeNew {
        name: Some("Salary".to_string()),
        planned_amount: Some(Scalar::from("1000.00")),
        planned_pay_date: Some(DateInput::from(Utc::now())),
        budget_id: Some(budget_id.to_string()),
        ..Default::default()
    }
}

pub fn rent(budget_id: &str) -> ExpenseNew {
    ExpenseNew {
        name: Some("Rent".to_string()),
        planned_amount: Some(Scalar::from("750.00")),
        budget_id: Some(budget_id.to_string()),
        ..Default::default()
    }
}

pub fn category(name: &str) -> CategoryNew {
    CategoryNew {
        name: Some(name.to_string()),
        ..Default::default()
    }
}
