//! Expenses API endpoints, including category tagging.

use api_types::{
    category::CategoryView,
    expense::{ExpenseNew, ExpenseUpdate, ExpenseView},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::EngineError;

use crate::{ServerError, categories::map_category, server::ServerState};

pub(crate) fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        name: expense.name,
        description: expense.description,
        status: expense.status.as_str().to_string(),
        planned_amount: expense.planned_amount,
        actual_amount: expense.actual_amount,
        due_date: expense.due_date,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
        initiation_date: expense.initiation_date,
        completion_date: expense.completion_date,
        cancelation_date: expense.cancelation_date,
        budget_id: expense.budget_id,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state
        .engine
        .expenses()
        .await?
        .into_iter()
        .map(map_expense)
        .collect();
    Ok(Json(expenses))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .expense(&expense_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "Expense",
            id: expense_id,
        })?;
    Ok(Json(map_expense(expense)))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let Json(payload) = payload?;
    let expense = state.engine.create_expense(payload).await?;
    tracing::debug!(expense_id = %expense.id, budget_id = %expense.budget_id, "expense created");
    Ok(Json(map_expense(expense)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let Json(payload) = payload?;
    let expense = state.engine.update_expense(&expense_id, payload).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn categories(
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .expense_categories(&expense_id)
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

pub async fn tag(
    State(state): State<ServerState>,
    Path((expense_id, category_id)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .tag_expense_with_category(&expense_id, &category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn untag(
    State(state): State<ServerState>,
    Path((expense_id, category_id)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .untag_expense_from_category(&expense_id, &category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
