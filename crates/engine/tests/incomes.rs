use api_types::{
    DateInput, Scalar,
    income::{IncomeNew, IncomeUpdate},
};

use engine::{EngineError, IncomeStatus, IssueKind};

mod common;
use common::{budget, engine_with_db, salary};

#[tokio::test]
async fn income_requires_an_existing_budget() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.create_income(salary("missing")).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::NotFound {
            entity: "Budget",
            id: "missing".to_string()
        }
    );
    assert!(engine.incomes().await.unwrap().is_empty());
}

#[tokio::test]
async fn numeric_amount_is_stored_as_text() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;

    let income = engine
        .create_income(IncomeNew {
            planned_amount: Some(Scalar::from(1000)),
            description: Some("   ".to_string()),
            ..salary(&b1.id)
        })
        .await
        .unwrap();

    assert_eq!(income.planned_amount, "1000");
    assert_eq!(income.description, None);
}

#[tokio::test]
async fn malformed_amount_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;

    let err = engine
        .create_income(IncomeNew {
            planned_amount: Some(Scalar::from("10.5")),
            ..salary(&b1.id)
        })
        .await
        .unwrap_err();

    let EngineError::Validation(err) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert!(err.has("plannedAmount", IssueKind::Pattern));
}

#[tokio::test]
async fn completing_needs_companion_fields() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;
    let income = engine.create_income(salary(&b1.id)).await.unwrap();

    let err = engine
        .update_income(
            &income.id,
            IncomeUpdate {
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    let EngineError::Validation(err) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert!(err.has("completedAt", IssueKind::Missing));
    assert!(err.has("actualAmount", IssueKind::Missing));
    assert!(err.has("actualPayDate", IssueKind::Missing));

    let stored = engine.income(&income.id).await.unwrap().unwrap();
    assert_eq!(stored.status, IncomeStatus::Planned);
}

#[tokio::test]
async fn complete_then_reopen() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;
    let income = engine.create_income(salary(&b1.id)).await.unwrap();

    let completed = engine
        .update_income(
            &income.id,
            IncomeUpdate {
                status: Some("completed".to_string()),
                completed_at: Some(Some(DateInput::from("2024-05-27T09:00:00Z"))),
                actual_pay_date: Some(Some(DateInput::from("2024-05-27"))),
                actual_amount: Some(Some(Scalar::from("990.00"))),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(completed.status, IncomeStatus::Completed);
    assert_eq!(completed.actual_amount.as_deref(), Some("990.00"));
    assert!(completed.updated_at >= income.updated_at);
    assert_eq!(completed.created_at, income.created_at);

    let reopened = engine
        .update_income(
            &income.id,
            IncomeUpdate {
                status: Some("planned".to_string()),
                planned_amount: Some(Scalar::from("1000.00")),
                planned_pay_date: Some(DateInput::from("2024-06-27")),
                actual_amount: Some(None),
                actual_pay_date: Some(None),
                completed_at: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reopened.status, IncomeStatus::Planned);
    assert_eq!(reopened.actual_amount, None);
    assert_eq!(reopened.actual_pay_date, None);
    assert_eq!(reopened.completed_at, None);
}

#[tokio::test]
async fn same_status_is_not_a_transition() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;
    let income = engine.create_income(salary(&b1.id)).await.unwrap();

    let updated = engine
        .update_income(
            &income.id,
            IncomeUpdate {
                status: Some("planned".to_string()),
                name: Some("Bonus".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Bonus");
    assert_eq!(updated.planned_amount, income.planned_amount);
}

#[tokio::test]
async fn null_clears_description() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;
    let income = engine
        .create_income(IncomeNew {
            description: Some("monthly".to_string()),
            ..salary(&b1.id)
        })
        .await
        .unwrap();
    assert_eq!(income.description.as_deref(), Some("monthly"));

    let untouched = engine
        .update_income(
            &income.id,
            IncomeUpdate {
                name: Some("Salary May".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(untouched.description.as_deref(), Some("monthly"));

    let cleared = engine
        .update_income(
            &income.id,
            IncomeUpdate {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
}

#[tokio::test]
async fn moving_to_unknown_budget_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;
    let b2 = budget(&engine, "B2").await;
    let income = engine.create_income(salary(&b1.id)).await.unwrap();

    let err = engine
        .update_income(
            &income.id,
            IncomeUpdate {
                budget_id: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { entity: "Budget", .. }));

    let moved = engine
        .update_income(
            &income.id,
            IncomeUpdate {
                budget_id: Some(b2.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.budget_id, b2.id);
}

#[tokio::test]
async fn completed_on_create_needs_companions() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;

    let err = engine
        .create_income(IncomeNew {
            status: Some("completed".to_string()),
            ..salary(&b1.id)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let income = engine
        .create_income(IncomeNew {
            status: Some("completed".to_string()),
            completed_at: Some(DateInput::from("2024-05-27")),
            actual_pay_date: Some(DateInput::from("2024-05-27")),
            actual_amount: Some(Scalar::from("1000.00")),
            ..salary(&b1.id)
        })
        .await
        .unwrap();
    assert_eq!(income.status, IncomeStatus::Completed);
}

#[tokio::test]
async fn unknown_income_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.income("ghost").await.unwrap().is_none());
    let err = engine.delete_income("ghost").await.unwrap_err();
    assert_eq!(err.to_string(), "Income with ID ghost not found");
    let err = engine
        .update_income("ghost", IncomeUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { entity: "Income", .. }));
}

#[tokio::test]
async fn delete_removes_only_that_income() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;
    let first = engine.create_income(salary(&b1.id)).await.unwrap();
    let second = engine.create_income(salary(&b1.id)).await.unwrap();

    engine.delete_income(&first.id).await.unwrap();

    let remaining = engine.incomes().await.unwrap();
    assert_eq!(remaining, vec![second]);
}
