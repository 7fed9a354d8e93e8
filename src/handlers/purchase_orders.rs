use super::common::{created_response, map_service_error, success_response, validate_input, Json};
use crate::{
    auth::AuthenticatedUser, errors::ApiError,
    services::purchase_orders::CreatePurchaseOrderRequest, AppState,
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
pub struct PurchaseOrderListQuery {
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    pub status: Option<String>,
}

async fn list_purchase_orders(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Query(query): Query<PurchaseOrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .services
        .purchase_orders
        .list_purchase_orders(query.order_type, query.status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({ "purchaseOrders": orders })))
}

async fn get_purchase_order(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .purchase_orders
        .get_purchase_order(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound("Purchase order not found".to_string()))?;

    Ok(success_response(json!({ "purchaseOrder": order })))
}

/// Create a purchase order and its line items in one shot
async fn create_purchase_order(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .purchase_orders
        .create_purchase_order(payload)
        .await
        .map_err(map_service_error)?;

    info!(order_id = %order.order.id, user_id = %user.user_id, "Purchase order created");
    Ok(created_response(json!({ "purchaseOrder": order })))
}

pub fn purchase_order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_purchase_orders))
        .route("/", post(create_purchase_order))
        .route("/:id", get(get_purchase_order))
}
