//! Incomes API endpoints.

use api_types::income::{IncomeNew, IncomeUpdate, IncomeView};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::EngineError;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_income(income: engine::Income) -> IncomeView {
    IncomeView {
        id: income.id,
        name: income.name,
        description: income.description,
        status: income.status.as_str().to_string(),
        planned_amount: income.planned_amount,
        actual_amount: income.actual_amount,
        planned_pay_date: income.planned_pay_date,
        actual_pay_date: income.actual_pay_date,
        created_at: income.created_at,
        updated_at: income.updated_at,
        completed_at: income.completed_at,
        budget_id: income.budget_id,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<IncomeView>>, ServerError> {
    let incomes = state
        .engine
        .incomes()
        .await?
        .into_iter()
        .map(map_income)
        .collect();
    Ok(Json(incomes))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(income_id): Path<String>,
) -> Result<Json<IncomeView>, ServerError> {
    let income = state
        .engine
        .income(&income_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "Income",
            id: income_id,
        })?;
    Ok(Json(map_income(income)))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<IncomeNew>, JsonRejection>,
) -> Result<Json<IncomeView>, ServerError> {
    let Json(payload) = payload?;
    let income = state.engine.create_income(payload).await?;
    tracing::debug!(income_id = %income.id, budget_id = %income.budget_id, "income created");
    Ok(Json(map_income(income)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(income_id): Path<String>,
    payload: Result<Json<IncomeUpdate>, JsonRejection>,
) -> Result<Json<IncomeView>, ServerError> {
    let Json(payload) = payload?;
    let income = state.engine.update_income(&income_id, payload).await?;
    Ok(Json(map_income(income)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(income_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(&income_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
