use super::common::{created_response, map_service_error, success_response, validate_input, Json};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    services::brands::{BrandRemoval, CreateBrandRequest, UpdateBrandRequest},
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
pub struct BrandListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

/// List brands. The payload carries the plain name list alongside the full
/// rows because dropdown consumers only want the former.
async fn list_brands(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Query(query): Query<BrandListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let brands = state
        .services
        .brands
        .list_brands(query.search, query.status)
        .await
        .map_err(map_service_error)?;

    let names: Vec<&str> = brands.iter().map(|b| b.name.as_str()).collect();
    Ok(success_response(json!({
        "brands": names,
        "brandList": brands,
    })))
}

async fn get_brand(
    State(state): State<Arc<AppState>>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = state
        .services
        .brands
        .get_brand(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound("Brand not found".to_string()))?;

    Ok(success_response(json!({ "brand": brand })))
}

async fn create_brand(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateBrandRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let brand = state
        .services
        .brands
        .create_brand(payload)
        .await
        .map_err(map_service_error)?;

    info!(brand_id = %brand.id, user_id = %user.user_id, "Brand created");
    Ok(created_response(json!({ "brand": brand })))
}

async fn update_brand(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBrandRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let brand = state
        .services
        .brands
        .update_brand(id, payload)
        .await
        .map_err(map_service_error)?;

    info!(brand_id = %brand.id, user_id = %user.user_id, "Brand updated");
    Ok(success_response(json!({ "brand": brand })))
}

/// Delete a brand, or deactivate it when items still reference it. Both
/// outcomes are 200; the body says which one happened.
async fn delete_brand(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .services
        .brands
        .delete_or_deactivate(id)
        .await
        .map_err(map_service_error)?;

    info!(brand_id = %id, user_id = %user.user_id, "Brand delete requested");
    match outcome {
        BrandRemoval::Deleted => Ok(success_response(json!({
            "message": "Brand deleted successfully",
        }))),
        BrandRemoval::Deactivated(brand) => Ok(success_response(json!({
            "brand": brand,
            "message": "Brand marked as inactive because it is in use",
        }))),
    }
}

pub fn brand_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_brands))
        .route("/", post(create_brand))
        .route("/:id", get(get_brand))
        .route("/:id", put(update_brand))
        .route("/:id", delete(delete_brand))
}
