use super::common::{created_response, map_service_error, success_response, validate_input, Json};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    services::parts::{CreatePartRequest, UpdatePartRequest},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct PartListQuery {
    pub search: Option<String>,
}

async fn list_parts(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Query(query): Query<PartListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let parts = state
        .services
        .parts
        .list_parts(query.search)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({ "parts": parts })))
}

async fn get_part(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let part = state
        .services
        .parts
        .get_part(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound("Part not found".to_string()))?;

    Ok(success_response(json!({ "part": part })))
}

async fn create_part(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(payload): Json<CreatePartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let part = state
        .services
        .parts
        .create_part(payload)
        .await
        .map_err(map_service_error)?;

    info!(part_id = %part.part.id, user_id = %user.user_id, "Part created");
    Ok(created_response(json!({ "part": part })))
}

/// Update a part; the request's model list replaces the stored set wholesale
async fn update_part(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let part = state
        .services
        .parts
        .update_part_with_models(id, payload)
        .await
        .map_err(map_service_error)?;

    info!(part_id = %id, user_id = %user.user_id, "Part updated");
    Ok(success_response(json!({ "part": part })))
}

async fn delete_part(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .parts
        .delete_part(id)
        .await
        .map_err(map_service_error)?;

    info!(part_id = %id, user_id = %user.user_id, "Part deleted");
    Ok(success_response(json!({
        "message": "Part deleted successfully",
    })))
}

pub fn part_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_parts))
        .route("/", post(create_part))
        .route("/:id", get(get_part))
        .route("/:id", put(update_part))
        .route("/:id", delete(delete_part))
}
