use super::common::{created_response, map_service_error, success_response, validate_input, Json};
use crate::{
    auth::AuthenticatedUser, errors::ApiError, services::items::CreateItemRequest, AppState,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemListQuery {
    pub search: Option<String>,
    pub brand_id: Option<Uuid>,
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Query(query): Query<ItemListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .items
        .list_items(query.search, query.brand_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({ "items": items })))
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let item = state
        .services
        .items
        .create_item(payload)
        .await
        .map_err(map_service_error)?;

    info!(item_id = %item.id, user_id = %user.user_id, "Item created");
    Ok(created_response(json!({ "item": item })))
}

pub fn item_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_items))
        .route("/", post(create_item))
}
