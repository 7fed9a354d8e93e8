#![forbid(unsafe_code)]

//! Inventory and procurement HTTP API: brands, catalog items, parts with
//! model mappings, suppliers and purchase orders over a relational store.

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

/// Shared application state injected into every handler
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub auth: Arc<auth::AuthVerifier>,
    pub services: handlers::AppServices,
}

/// All authenticated resource routes, mounted under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/brands", handlers::brands::brand_routes())
        .nest("/items", handlers::items::item_routes())
        .nest("/parts", handlers::parts::part_routes())
        .nest("/suppliers", handlers::suppliers::supplier_routes())
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::purchase_order_routes(),
        )
}

/// Full application router: `/health` is open, everything else sits behind
/// bearer auth inside the handlers.
pub fn app_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", handlers::health::health_routes())
        .nest("/api", api_routes())
}
