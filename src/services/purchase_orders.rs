use crate::{
    db::DbPool,
    entities::{part, purchase_order, purchase_order_item, supplier},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderItemRequest {
    pub part_id: Option<Uuid>,
    pub part_no: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub uom: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderRequest {
    #[validate(length(min = 1, message = "PO number is required"))]
    pub po_no: String,
    pub supplier_id: Option<Uuid>,
    pub supplier_name: Option<String>,
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    pub status: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
    pub expected_date: Option<DateTime<Utc>>,
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<CreatePurchaseOrderItemRequest>,
}

/// A purchase order hydrated with its supplier and line items (each joined to
/// its part, when one is referenced)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderResponse {
    #[serde(flatten)]
    pub order: purchase_order::Model,
    pub supplier: Option<supplier::Model>,
    pub items: Vec<PurchaseOrderItemResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderItemResponse {
    #[serde(flatten)]
    pub item: purchase_order_item::Model,
    pub part: Option<part::Model>,
}

/// Service for purchase orders; creation is a single atomic unit covering the
/// order row and every line item.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db_pool: Arc<DbPool>,
}

impl PurchaseOrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists purchase orders (optionally filtered by type and status), newest
    /// first, with supplier, items and item parts eagerly loaded
    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        order_type: Option<String>,
        status: Option<String>,
    ) -> Result<Vec<PurchaseOrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = purchase_order::Entity::find();
        if let Some(order_type) = order_type.filter(|s| !s.is_empty()) {
            query = query.filter(purchase_order::Column::OrderType.eq(order_type));
        }
        if let Some(status) = status.filter(|s| !s.is_empty()) {
            query = query.filter(purchase_order::Column::Status.eq(status));
        }

        let orders = query
            .order_by_desc(purchase_order::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch purchase orders");
                ServiceError::DatabaseError(e)
            })?;

        self.hydrate_orders(orders).await
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_purchase_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<PurchaseOrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        let order = purchase_order::Entity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        match order {
            Some(order) => {
                let mut hydrated = self.hydrate_orders(vec![order]).await?;
                Ok(hydrated.pop())
            }
            None => Ok(None),
        }
    }

    /// Creates a purchase order with its line items as one atomic unit.
    ///
    /// The supplier name must resolve before anything is written: either it
    /// is given explicitly, or it is copied from the referenced supplier.
    #[instrument(skip(self, request), fields(po_no = %request.po_no))]
    pub async fn create_purchase_order(
        &self,
        request: CreatePurchaseOrderRequest,
    ) -> Result<PurchaseOrderResponse, ServiceError> {
        let db = &*self.db_pool;

        let resolved_supplier = match request.supplier_id {
            Some(supplier_id) => supplier::Entity::find_by_id(supplier_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?,
            None => None,
        };

        let supplier_name = request
            .supplier_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .or_else(|| resolved_supplier.as_ref().map(|s| s.name.clone()))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ServiceError::ValidationError("Supplier name is required".to_string())
            })?;

        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for purchase order creation");
            ServiceError::DatabaseError(e)
        })?;

        let order = purchase_order::ActiveModel {
            id: Set(order_id),
            po_no: Set(request.po_no),
            supplier_id: Set(request.supplier_id),
            supplier_name: Set(supplier_name),
            order_type: Set(request
                .order_type
                .unwrap_or_else(|| purchase_order::DEFAULT_TYPE.to_string())),
            status: Set(request
                .status
                .unwrap_or_else(|| purchase_order::DEFAULT_STATUS.to_string())),
            order_date: Set(request.order_date.unwrap_or(now)),
            expected_date: Set(request.expected_date),
            total_amount: Set(request.total_amount.unwrap_or(Decimal::ZERO)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        order.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to insert purchase order");
            ServiceError::DatabaseError(e)
        })?;

        for item in request.items {
            let line = purchase_order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_order_id: Set(order_id),
                part_id: Set(item.part_id),
                part_no: Set(item.part_no.unwrap_or_default()),
                description: Set(item.description),
                quantity: Set(item.quantity.unwrap_or(1)),
                unit_price: Set(item.unit_price.unwrap_or(Decimal::ZERO)),
                total_price: Set(item.total_price.unwrap_or(Decimal::ZERO)),
                uom: Set(item.uom),
            };
            line.insert(&txn).await.map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to insert purchase order item");
                ServiceError::DatabaseError(e)
            })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit purchase order transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, "Purchase order created successfully");

        self.get_purchase_order(order_id).await?.ok_or_else(|| {
            ServiceError::InternalError("purchase order missing after commit".to_string())
        })
    }

    async fn hydrate_orders(
        &self,
        orders: Vec<purchase_order::Model>,
    ) -> Result<Vec<PurchaseOrderResponse>, ServiceError> {
        let db = &*self.db_pool;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let suppliers = orders
            .load_one(supplier::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let items = orders
            .load_many(purchase_order_item::Entity, db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let part_ids: Vec<Uuid> = items
            .iter()
            .flatten()
            .filter_map(|item| item.part_id)
            .collect();
        let parts: HashMap<Uuid, part::Model> = if part_ids.is_empty() {
            HashMap::new()
        } else {
            part::Entity::find()
                .filter(part::Column::Id.is_in(part_ids))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .into_iter()
                .map(|p| (p.id, p))
                .collect()
        };

        Ok(orders
            .into_iter()
            .zip(suppliers)
            .zip(items)
            .map(|((order, supplier), items)| PurchaseOrderResponse {
                order,
                supplier,
                items: items
                    .into_iter()
                    .map(|item| {
                        let part = item.part_id.and_then(|id| parts.get(&id).cloned());
                        PurchaseOrderItemResponse { item, part }
                    })
                    .collect(),
            })
            .collect())
    }
}
