use crate::{
    db::DbPool,
    entities::{brand, item},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub item_no: Option<String>,
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    pub brand_id: Option<Uuid>,
}

/// Service for catalog items, the rows that keep brands referenced
#[derive(Clone)]
pub struct ItemService {
    db_pool: Arc<DbPool>,
}

impl ItemService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists items filtered by name substring, optionally restricted to one brand
    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        search: Option<String>,
        brand_id: Option<Uuid>,
    ) -> Result<Vec<item::Model>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = item::Entity::find();
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(item::Column::Name.contains(&search));
        }
        if let Some(brand_id) = brand_id {
            query = query.filter(item::Column::BrandId.eq(brand_id));
        }

        query
            .order_by_asc(item::Column::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch items");
                ServiceError::DatabaseError(e)
            })
    }

    /// Creates an item; a referenced brand must exist
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_item(&self, request: CreateItemRequest) -> Result<item::Model, ServiceError> {
        let db = &*self.db_pool;

        if let Some(brand_id) = request.brand_id {
            brand::Entity::find_by_id(brand_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| ServiceError::ValidationError("Brand not found".to_string()))?;
        }

        let now = Utc::now();
        let item = item::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_no: Set(request.item_no),
            name: Set(request.name.trim().to_string()),
            brand_id: Set(request.brand_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let item = item.insert(db).await.map_err(|e| {
            error!(error = %e, "Failed to insert item");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %item.id, "Item created successfully");
        Ok(item)
    }
}
