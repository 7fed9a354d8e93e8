use super::common::{created_response, map_service_error, success_response, validate_input, Json};
use crate::{
    auth::AuthenticatedUser, errors::ApiError, services::suppliers::CreateSupplierRequest,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
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
pub struct SupplierListQuery {
    pub search: Option<String>,
}

async fn list_suppliers(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Query(query): Query<SupplierListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let suppliers = state
        .services
        .suppliers
        .list_suppliers(query.search)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({ "suppliers": suppliers })))
}

async fn get_supplier(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .services
        .suppliers
        .get_supplier(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound("Supplier not found".to_string()))?;

    Ok(success_response(json!({ "supplier": supplier })))
}

async fn create_supplier(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .create_supplier(payload)
        .await
        .map_err(map_service_error)?;

    info!(supplier_id = %supplier.id, user_id = %user.user_id, "Supplier created");
    Ok(created_response(json!({ "supplier": supplier })))
}

pub fn supplier_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_suppliers))
        .route("/", post(create_supplier))
        .route("/:id", get(get_supplier))
}
