use crate::db::DbPool;
use crate::services::{
    brands::BrandService, items::ItemService, parts::PartService,
    purchase_orders::PurchaseOrderService, suppliers::SupplierService,
};
use std::sync::Arc;

pub mod brands;
pub mod common;
pub mod health;
pub mod items;
pub mod parts;
pub mod purchase_orders;
pub mod suppliers;

/// Service registry shared through [`crate::AppState`]
#[derive(Clone)]
pub struct AppServices {
    pub brands: BrandService,
    pub items: ItemService,
    pub parts: PartService,
    pub purchase_orders: PurchaseOrderService,
    pub suppliers: SupplierService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            brands: BrandService::new(db_pool.clone()),
            items: ItemService::new(db_pool.clone()),
            parts: PartService::new(db_pool.clone()),
            purchase_orders: PurchaseOrderService::new(db_pool.clone()),
            suppliers: SupplierService::new(db_pool),
        }
    }
}
