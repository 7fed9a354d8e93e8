use crate::{
    db::DbPool,
    entities::{brand, item},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandRequest {
    #[validate(length(min = 1, message = "Brand name is required"))]
    pub name: String,
    #[validate(custom = "validate_status")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBrandRequest {
    #[validate(length(min = 1, message = "Brand name is required"))]
    pub name: Option<String>,
    #[validate(custom = "validate_status")]
    pub status: Option<String>,
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if status == brand::STATUS_ACTIVE || status == brand::STATUS_INACTIVE {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_status");
        err.message = Some("status must be 'active' or 'inactive'".into());
        Err(err)
    }
}

/// Outcome of a guarded brand delete: either the row is gone, or it was kept
/// and flipped to inactive because items still reference it.
#[derive(Debug)]
pub enum BrandRemoval {
    Deleted,
    Deactivated(brand::Model),
}

/// Service for managing brands, including the referential-guard delete policy
#[derive(Clone)]
pub struct BrandService {
    db_pool: Arc<DbPool>,
}

impl BrandService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists brands filtered by name substring and status, sorted by name ascending
    #[instrument(skip(self))]
    pub async fn list_brands(
        &self,
        search: Option<String>,
        status: Option<String>,
    ) -> Result<Vec<brand::Model>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = brand::Entity::find();
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(brand::Column::Name.contains(&search));
        }
        if let Some(status) = status.filter(|s| !s.is_empty()) {
            query = query.filter(brand::Column::Status.eq(status));
        }

        let brands = query
            .order_by_asc(brand::Column::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch brands");
                ServiceError::DatabaseError(e)
            })?;

        Ok(brands)
    }

    #[instrument(skip(self), fields(brand_id = %brand_id))]
    pub async fn get_brand(&self, brand_id: Uuid) -> Result<Option<brand::Model>, ServiceError> {
        let db = &*self.db_pool;
        brand::Entity::find_by_id(brand_id).one(db).await.map_err(|e| {
            error!(error = %e, brand_id = %brand_id, "Failed to fetch brand");
            ServiceError::DatabaseError(e)
        })
    }

    /// Creates a brand. Name uniqueness is pre-checked optimistically and the
    /// store's unique constraint is mapped to a Conflict if a concurrent
    /// insert races past the check.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_brand(
        &self,
        request: CreateBrandRequest,
    ) -> Result<brand::Model, ServiceError> {
        let db = &*self.db_pool;
        let name = request.name.trim().to_string();

        let existing = brand::Entity::find()
            .filter(brand::Column::Name.eq(&name))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict("Brand already exists".to_string()));
        }

        let now = Utc::now();
        let brand = brand::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            status: Set(request
                .status
                .unwrap_or_else(|| brand::STATUS_ACTIVE.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let brand = brand.insert(db).await.map_err(map_unique_violation)?;

        info!(brand_id = %brand.id, "Brand created successfully");
        Ok(brand)
    }

    /// Applies a partial update; a new name is checked for duplicates against
    /// every other brand first.
    #[instrument(skip(self, request), fields(brand_id = %brand_id))]
    pub async fn update_brand(
        &self,
        brand_id: Uuid,
        request: UpdateBrandRequest,
    ) -> Result<brand::Model, ServiceError> {
        let db = &*self.db_pool;

        let brand = brand::Entity::find_by_id(brand_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Brand not found".to_string()))?;

        if let Some(name) = request.name.as_deref() {
            let duplicate = brand::Entity::find()
                .filter(brand::Column::Name.eq(name.trim()))
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            if duplicate.map(|b| b.id != brand_id).unwrap_or(false) {
                return Err(ServiceError::Conflict(
                    "Brand name already exists".to_string(),
                ));
            }
        }

        let mut active: brand::ActiveModel = brand.into();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        let brand = active.update(db).await.map_err(map_unique_violation)?;

        info!(brand_id = %brand.id, "Brand updated successfully");
        Ok(brand)
    }

    /// Deletes the brand when nothing references it; otherwise flips its
    /// status to inactive so historical items keep a valid reference.
    #[instrument(skip(self), fields(brand_id = %brand_id))]
    pub async fn delete_or_deactivate(&self, brand_id: Uuid) -> Result<BrandRemoval, ServiceError> {
        let db = &*self.db_pool;

        let brand = brand::Entity::find_by_id(brand_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Brand not found".to_string()))?;

        let dependents = item::Entity::find()
            .filter(item::Column::BrandId.eq(brand_id))
            .count(db)
            .await
            .map_err(|e| {
                error!(error = %e, brand_id = %brand_id, "Failed to count brand dependents");
                ServiceError::DatabaseError(e)
            })?;

        if dependents == 0 {
            brand.delete(db).await.map_err(ServiceError::DatabaseError)?;
            info!(brand_id = %brand_id, "Brand deleted");
            return Ok(BrandRemoval::Deleted);
        }

        warn!(brand_id = %brand_id, dependents, "Brand in use; deactivating instead of deleting");

        let mut active: brand::ActiveModel = brand.into();
        active.status = Set(brand::STATUS_INACTIVE.to_string());
        active.updated_at = Set(Utc::now());
        let brand = active.update(db).await.map_err(ServiceError::DatabaseError)?;

        Ok(BrandRemoval::Deactivated(brand))
    }
}

fn map_unique_violation(e: DbErr) -> ServiceError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        ServiceError::Conflict("Brand name already exists".to_string())
    } else {
        error!(error = %e, "Brand write failed");
        ServiceError::DatabaseError(e)
    }
}
