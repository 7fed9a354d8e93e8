use crate::{
    db::DbPool,
    entities::{part, part_model, stock},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModelMappingRequest {
    #[validate(length(min = 1, message = "Model number is required"))]
    pub model_no: String,
    pub qty_used: i32,
    pub tab: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartRequest {
    #[validate(length(min = 1, message = "Part number is required"))]
    pub part_no: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub remarks: Option<String>,
    #[serde(default)]
    #[validate]
    pub models: Vec<ModelMappingRequest>,
}

/// Partial part update; the mapping list always fully replaces the stored
/// set, so an omitted `models` clears every mapping.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartRequest {
    #[validate(length(min = 1, message = "Part number is required"))]
    pub part_no: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub remarks: Option<String>,
    #[serde(default)]
    #[validate]
    pub models: Vec<ModelMappingRequest>,
}

/// A part hydrated with its model mappings and stock records
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDetail {
    #[serde(flatten)]
    pub part: part::Model,
    pub models: Vec<part_model::Model>,
    pub stock: Vec<stock::Model>,
}

/// Service for managing parts and their model-mapping set
#[derive(Clone)]
pub struct PartService {
    db_pool: Arc<DbPool>,
}

impl PartService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_parts(&self, search: Option<String>) -> Result<Vec<part::Model>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = part::Entity::find();
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(part::Column::PartNo.contains(&search))
                    .add(part::Column::Description.contains(&search)),
            );
        }

        query
            .order_by_asc(part::Column::PartNo)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch parts");
                ServiceError::DatabaseError(e)
            })
    }

    /// Fetches a part with its models and stock eagerly loaded
    #[instrument(skip(self), fields(part_id = %part_id))]
    pub async fn get_part(&self, part_id: Uuid) -> Result<Option<PartDetail>, ServiceError> {
        let db = &*self.db_pool;

        let part = part::Entity::find_by_id(part_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        match part {
            Some(part) => Ok(Some(self.hydrate(part).await?)),
            None => Ok(None),
        }
    }

    /// Creates a part together with its initial model mappings in one
    /// transaction.
    #[instrument(skip(self, request), fields(part_no = %request.part_no))]
    pub async fn create_part(&self, request: CreatePartRequest) -> Result<PartDetail, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();
        let part_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for part creation");
            ServiceError::DatabaseError(e)
        })?;

        let part = part::ActiveModel {
            id: Set(part_id),
            part_no: Set(request.part_no.trim().to_string()),
            description: Set(request.description),
            unit: Set(request.unit),
            remarks: Set(request.remarks),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let part = part.insert(&txn).await.map_err(|e| {
            error!(error = %e, part_id = %part_id, "Failed to insert part");
            ServiceError::DatabaseError(e)
        })?;

        if !request.models.is_empty() {
            part_model::Entity::insert_many(to_active_models(part_id, request.models))
                .exec(&txn)
                .await
                .map_err(|e| {
                    error!(error = %e, part_id = %part_id, "Failed to insert model mappings");
                    ServiceError::DatabaseError(e)
                })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, part_id = %part_id, "Failed to commit part creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(part_id = %part_id, "Part created successfully");
        self.hydrate(part).await
    }

    /// Updates a part's own fields and fully replaces its model-mapping set.
    ///
    /// The delete-then-insert pair runs inside one transaction so no reader
    /// ever observes the part with a partially written mapping set.
    #[instrument(skip(self, request), fields(part_id = %part_id))]
    pub async fn update_part_with_models(
        &self,
        part_id: Uuid,
        request: UpdatePartRequest,
    ) -> Result<PartDetail, ServiceError> {
        let db = &*self.db_pool;

        let part = part::Entity::find_by_id(part_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Part not found".to_string()))?;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, part_id = %part_id, "Failed to start transaction for part update");
            ServiceError::DatabaseError(e)
        })?;

        let mut active: part::ActiveModel = part.into();
        if let Some(part_no) = request.part_no {
            active.part_no = Set(part_no.trim().to_string());
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(unit) = request.unit {
            active.unit = Set(Some(unit));
        }
        if let Some(remarks) = request.remarks {
            active.remarks = Set(Some(remarks));
        }
        active.updated_at = Set(Utc::now());

        let part = active.update(&txn).await.map_err(|e| {
            error!(error = %e, part_id = %part_id, "Failed to update part");
            ServiceError::DatabaseError(e)
        })?;

        part_model::Entity::delete_many()
            .filter(part_model::Column::PartId.eq(part_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, part_id = %part_id, "Failed to clear model mappings");
                ServiceError::DatabaseError(e)
            })?;

        if !request.models.is_empty() {
            part_model::Entity::insert_many(to_active_models(part_id, request.models))
                .exec(&txn)
                .await
                .map_err(|e| {
                    error!(error = %e, part_id = %part_id, "Failed to insert model mappings");
                    ServiceError::DatabaseError(e)
                })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, part_id = %part_id, "Failed to commit part update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(part_id = %part_id, "Part updated successfully");
        self.hydrate(part).await
    }

    /// Deletes a part and cascades to its model mappings and stock records.
    /// Unlike brands there is no referential guard here; the cascade is the
    /// documented behavior.
    #[instrument(skip(self), fields(part_id = %part_id))]
    pub async fn delete_part(&self, part_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let part = part::Entity::find_by_id(part_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Part not found".to_string()))?;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, part_id = %part_id, "Failed to start transaction for part deletion");
            ServiceError::DatabaseError(e)
        })?;

        part_model::Entity::delete_many()
            .filter(part_model::Column::PartId.eq(part_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        stock::Entity::delete_many()
            .filter(stock::Column::PartId.eq(part_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        part::ActiveModel::from(part)
            .delete(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, part_id = %part_id, "Failed to commit part deletion transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(part_id = %part_id, "Part deleted");
        Ok(())
    }

    async fn hydrate(&self, part: part::Model) -> Result<PartDetail, ServiceError> {
        let db = &*self.db_pool;

        let models = part
            .find_related(part_model::Entity)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let stock = part
            .find_related(stock::Entity)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(PartDetail {
            part,
            models,
            stock,
        })
    }
}

fn to_active_models(
    part_id: Uuid,
    models: Vec<ModelMappingRequest>,
) -> Vec<part_model::ActiveModel> {
    models
        .into_iter()
        .map(|m| part_model::ActiveModel {
            id: Set(Uuid::new_v4()),
            part_id: Set(part_id),
            model_no: Set(m.model_no),
            qty_used: Set(m.qty_used),
            tab: Set(m.tab.unwrap_or_else(|| part_model::DEFAULT_TAB.to_string())),
        })
        .collect()
}
