//! Budgets API endpoints.

use api_types::budget::{BudgetDetail, BudgetNew, BudgetUpdate, BudgetView};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::EngineError;

use crate::{ServerError, expenses::map_expense, incomes::map_income, server::ServerState};

pub(crate) fn map_budget(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        name: budget.name,
        start_date: budget.start_date,
        end_date: budget.end_date,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let budgets = state
        .engine
        .budgets()
        .await?
        .into_iter()
        .map(map_budget)
        .collect();
    Ok(Json(budgets))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(budget_id): Path<String>,
) -> Result<Json<BudgetDetail>, ServerError> {
    let detail = state
        .engine
        .budget(&budget_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "Budget",
            id: budget_id,
        })?;

    Ok(Json(BudgetDetail {
        budget: map_budget(detail.budget),
        income: detail.income.into_iter().map(map_income).collect(),
        expense: detail.expense.into_iter().map(map_expense).collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<BudgetNew>, JsonRejection>,
) -> Result<Json<BudgetView>, ServerError> {
    let Json(payload) = payload?;
    let budget = state.engine.create_budget(payload).await?;
    tracing::debug!(budget_id = %budget.id, "budget created");
    Ok(Json(map_budget(budget)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(budget_id): Path<String>,
    payload: Result<Json<BudgetUpdate>, JsonRejection>,
) -> Result<Json<BudgetView>, ServerError> {
    let Json(payload) = payload?;
    let budget = state.engine.update_budget(&budget_id, payload).await?;
    Ok(Json(map_budget(budget)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(budget_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&budget_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
