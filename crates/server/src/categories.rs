//! Categories API endpoints.

use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::EngineError;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        description: category.description,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(category_id): Path<String>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .category(&category_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "Category",
            id: category_id,
        })?;
    Ok(Json(map_category(category)))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CategoryNew>, JsonRejection>,
) -> Result<Json<CategoryView>, ServerError> {
    let Json(payload) = payload?;
    let category = state.engine.create_category(payload).await?;
    Ok(Json(map_category(category)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(category_id): Path<String>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<CategoryView>, ServerError> {
    let Json(payload) = payload?;
    let category = state.engine.update_category(&category_id, payload).await?;
    Ok(Json(map_category(category)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(category_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(&category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
