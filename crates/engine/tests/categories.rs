use api_types::category::{CategoryNew, CategoryUpdate};

use engine::{EngineError, IssueKind};

mod common;
use common::{budget, category, engine_with_db, rent};

#[tokio::test]
async fn create_list_and_get() {
    let (engine, _db) = engine_with_db().await;

    let food = engine
        .create_category(CategoryNew {
            description: Some("groceries and eating out".to_string()),
            ..category("Food")
        })
        .await
        .unwrap();
    let travel = engine.create_category(category("Travel")).await.unwrap();

    let listed = engine.categories().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&food));
    assert!(listed.contains(&travel));
    assert_eq!(engine.category(&food.id).await.unwrap(), Some(food));
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.create_category(category("  ")).await.unwrap_err();
    let EngineError::Validation(err) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert!(err.has("name", IssueKind::InvalidValue));
}

#[tokio::test]
async fn update_and_clear_description() {
    let (engine, _db) = engine_with_db().await;
    let food = engine
        .create_category(CategoryNew {
            description: Some("groceries".to_string()),
            ..category("Food")
        })
        .await
        .unwrap();

    let renamed = engine
        .update_category(
            &food.id,
            CategoryUpdate {
                name: Some("Groceries".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Groceries");
    assert_eq!(renamed.description.as_deref(), Some("groceries"));

    let cleared = engine
        .update_category(
            &food.id,
            CategoryUpdate {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
}

#[tokio::test]
async fn deleting_category_untags_expenses() {
    let (engine, _db) = engine_with_db().await;
    let b1 = budget(&engine, "B1").await;
    let expense = engine.create_expense(rent(&b1.id)).await.unwrap();
    let housing = engine.create_category(category("Housing")).await.unwrap();
    engine
        .tag_expense_with_category(&expense.id, &housing.id)
        .await
        .unwrap();

    engine.delete_category(&housing.id).await.unwrap();

    assert!(engine.category(&housing.id).await.unwrap().is_none());
    assert!(engine.expense(&expense.id).await.unwrap().is_some());
    assert!(engine.expense_categories(&expense.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_unknown_category_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.delete_category("non-existent-id").await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Category with ID non-existent-id not found"
    );
    let err = engine
        .update_category("non-existent-id", CategoryUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { entity: "Category", .. }));
}
