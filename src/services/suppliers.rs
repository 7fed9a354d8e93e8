use crate::{db::DbPool, entities::supplier, errors::ServiceError};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, message = "Supplier name is required"))]
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Service for the supplier directory
#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
}

impl SupplierService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        search: Option<String>,
    ) -> Result<Vec<supplier::Model>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = supplier::Entity::find();
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(supplier::Column::Name.contains(&search));
        }

        query
            .order_by_asc(supplier::Column::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch suppliers");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self), fields(supplier_id = %supplier_id))]
    pub async fn get_supplier(
        &self,
        supplier_id: Uuid,
    ) -> Result<Option<supplier::Model>, ServiceError> {
        let db = &*self.db_pool;
        supplier::Entity::find_by_id(supplier_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, supplier_id = %supplier_id, "Failed to fetch supplier");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_supplier(
        &self,
        request: CreateSupplierRequest,
    ) -> Result<supplier::Model, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let supplier = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            contact_name: Set(request.contact_name),
            phone: Set(request.phone),
            email: Set(request.email),
            address: Set(request.address),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let supplier = supplier.insert(db).await.map_err(|e| {
            error!(error = %e, "Failed to insert supplier");
            ServiceError::DatabaseError(e)
        })?;

        info!(supplier_id = %supplier.id, "Supplier created successfully");
        Ok(supplier)
    }
}
