use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(engine)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_budget(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/budget", Some(json!({ "name": "B1" }))).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_and_list_budgets() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/budgets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let id = create_budget(&app).await;

    let (status, body) = send(&app, Method::GET, "/budgets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], json!(id));
    assert_eq!(body[0]["name"], json!("B1"));
    assert!(body[0]["startDate"].is_string());
    assert!(body[0]["endDate"].is_string());
}

#[tokio::test]
async fn missing_body_is_rejected() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/budget", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Missing request body"));
}

#[tokio::test]
async fn validation_issues_are_reported() {
    let app = app().await;
    let budget_id = create_budget(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/income",
        Some(json!({ "budgetId": budget_id, "plannedAmount": "12.5" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let issues = body["issues"].as_array().unwrap();
    assert!(issues.contains(&json!({
        "field": "name",
        "kind": "missing",
        "message": "required field is missing"
    })));
    assert!(
        issues
            .iter()
            .any(|issue| issue["field"] == "plannedAmount" && issue["kind"] == "pattern")
    );
}

#[tokio::test]
async fn wrong_json_type_is_a_bad_request() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/category", Some(json!({ "name": 42 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["kind"], json!("wrong_type"));
}

#[tokio::test]
async fn budget_detail_embeds_incomes_and_expenses() {
    let app = app().await;
    let budget_id = create_budget(&app).await;

    let (status, income) = send(
        &app,
        Method::POST,
        "/income",
        Some(json!({
            "budgetId": budget_id,
            "name": "Salary",
            "plannedAmount": "1000.00",
            "plannedPayDate": "2024-05-27T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(income["status"], json!("planned"));
    assert!(income.get("actualAmount").is_none() || income["actualAmount"].is_null());

    let (status, detail) = send(&app, Method::GET, &format!("/budget/{budget_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["income"], json!([income]));
    assert_eq!(detail["expense"], json!([]));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/budget/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, "/category/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Category with ID ghost not found"));
}

#[tokio::test]
async fn invalid_transition_is_unprocessable() {
    let app = app().await;
    let budget_id = create_budget(&app).await;
    let (_, expense) = send(
        &app,
        Method::POST,
        "/expense",
        Some(json!({ "budgetId": budget_id, "name": "Rent", "plannedAmount": 750 })),
    )
    .await;
    assert_eq!(expense["plannedAmount"], json!("750"));
    let id = expense["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/expense/{id}"),
        Some(json!({
            "status": "completed",
            "completionDate": "2024-05-02",
            "actualAmount": "750.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn tag_list_and_untag() {
    let app = app().await;
    let budget_id = create_budget(&app).await;
    let (_, expense) = send(
        &app,
        Method::POST,
        "/expense",
        Some(json!({ "budgetId": budget_id, "name": "Rent", "plannedAmount": "750.00" })),
    )
    .await;
    let (_, category) = send(&app, Method::POST, "/category", Some(json!({ "name": "Housing" }))).await;
    let expense_id = expense["id"].as_str().unwrap();
    let category_id = category["id"].as_str().unwrap();
    let link = format!("/expense/{expense_id}/categories/{category_id}");

    let (status, _) = send(&app, Method::POST, &link, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, tagged) = send(
        &app,
        Method::GET,
        &format!("/expense/{expense_id}/categories"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tagged, json!([category]));

    let (status, _) = send(&app, Method::DELETE, &link, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &link, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn patch_null_clears_field() {
    let app = app().await;
    let (_, category) = send(
        &app,
        Method::POST,
        "/category",
        Some(json!({ "name": "Food", "description": "groceries" })),
    )
    .await;
    let id = category["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/category/{id}"),
        Some(json!({ "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], json!("Food"));
    assert!(updated.get("description").is_none() || updated["description"].is_null());
}
