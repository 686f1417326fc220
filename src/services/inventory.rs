use crate::{
    db::DbPool,
    entities::{bulk_inventory, packaged_inventory, stock_movement, storage_location},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{release_code, InventoryKind, MovementType, QualityGrade},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Goods receipt for a bulk product batch.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkReceiptInput {
    #[validate(length(min = 1, message = "Product id is required"))]
    pub product_id: String,
    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,
    #[validate(length(min = 1, message = "Batch number is required"))]
    pub batch_number: String,
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    pub quality_grade: QualityGrade,
    pub expiry_date: Option<NaiveDate>,
    pub release_code: Option<String>,
    pub location: Option<String>,
    pub received_from: Option<String>,
}

/// Goods receipt for a packaged product variant batch.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PackagedReceiptInput {
    #[validate(length(min = 1, message = "Product id is required"))]
    pub product_id: String,
    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,
    #[validate(length(min = 1, message = "Variant name is required"))]
    pub variant_name: String,
    #[validate(length(min = 1, message = "Variant size is required"))]
    pub variant_size: String,
    #[validate(length(min = 1, message = "Variant unit is required"))]
    pub variant_unit: String,
    #[validate(length(min = 1, message = "Batch number is required"))]
    pub batch_number: String,
    pub units_received: i32,
    pub quality_grade: QualityGrade,
    pub expiry_date: Option<NaiveDate>,
    pub release_code: Option<String>,
    pub location: Option<String>,
    pub received_from: Option<String>,
}

/// Expiry classification relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryStatus {
    #[strum(serialize = "expired")]
    Expired,
    #[strum(serialize = "critical")]
    Critical,
    #[strum(serialize = "warning")]
    Warning,
    #[strum(serialize = "good")]
    Good,
}

/// Critical inside a week, warning inside a month.
pub fn expiry_status(expiry: NaiveDate, today: NaiveDate) -> ExpiryStatus {
    let days = (expiry - today).num_days();
    if days < 0 {
        ExpiryStatus::Expired
    } else if days <= 7 {
        ExpiryStatus::Critical
    } else if days <= 30 {
        ExpiryStatus::Warning
    } else {
        ExpiryStatus::Good
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiryItem {
    pub id: Uuid,
    pub inventory_kind: InventoryKind,
    pub product_name: String,
    pub batch_number: String,
    pub location: String,
    pub expiry_date: NaiveDate,
    pub days_to_expiry: i64,
    pub status: ExpiryStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiryReport {
    pub items: Vec<ExpiryItem>,
    pub total: usize,
    pub expired: usize,
    pub critical: usize,
    pub warning: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationUtilization {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub capacity: Option<i32>,
    pub item_count: u64,
    pub utilization_percent: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationStats {
    pub locations: Vec<LocationUtilization>,
    pub total_locations: usize,
    pub total_capacity: i64,
    pub used_capacity: u64,
    pub utilization_percent: u64,
    pub full_locations: usize,
    pub empty_locations: usize,
}

/// Service for the finished-goods store: receipts, adjustments,
/// movement history, storage locations, and expiry monitoring.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    /// Fallback for receipts naming an unknown storage location.
    default_location: String,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, default_location: String) -> Self {
        Self {
            db_pool,
            event_sender,
            default_location,
        }
    }

    /// Receive bulk stock. An existing product+batch row is incremented,
    /// otherwise a new row is created; either way a receipt movement is
    /// logged in the same transaction.
    #[instrument(skip(self, input))]
    pub async fn add_to_inventory(
        &self,
        input: BulkReceiptInput,
        recorded_by: &str,
    ) -> Result<bulk_inventory::Model, ServiceError> {
        input.validate()?;
        if input.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Quantity must be greater than 0 for bulk products".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let location = self.resolve_location(input.location.as_deref()).await?;
        let reference = input
            .release_code
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| release_code(now));
        let recorded_by = recorded_by.to_string();
        let input_clone = input.clone();
        let reference_clone = reference.clone();

        let saved = db
            .transaction::<_, bulk_inventory::Model, ServiceError>(move |txn| {
                let input = input_clone;
                let reference = reference_clone;
                let location = location.clone();
                let recorded_by = recorded_by.clone();
                Box::pin(async move {
                    let existing = bulk_inventory::Entity::find()
                        .filter(bulk_inventory::Column::ProductId.eq(input.product_id.clone()))
                        .filter(bulk_inventory::Column::BatchNumber.eq(input.batch_number.clone()))
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    let saved = match existing {
                        Some(row) => {
                            let new_quantity = row.quantity + input.quantity;
                            let mut active: bulk_inventory::ActiveModel = row.into();
                            active.quantity = Set(new_quantity);
                            active.updated_at = Set(Some(now));
                            active.update(txn).await.map_err(ServiceError::db_error)?
                        }
                        None => {
                            let row = bulk_inventory::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                product_id: Set(input.product_id.clone()),
                                product_name: Set(input.product_name.clone()),
                                batch_number: Set(input.batch_number.clone()),
                                quantity: Set(input.quantity),
                                unit: Set(input.unit.clone()),
                                quality_grade: Set(input.quality_grade),
                                expiry_date: Set(input.expiry_date),
                                release_code: Set(reference.clone()),
                                location: Set(location.clone()),
                                received_from: Set(input
                                    .received_from
                                    .clone()
                                    .unwrap_or_else(|| "manual_entry".to_string())),
                                created_at: Set(now),
                                updated_at: Set(None),
                            };
                            row.insert(txn).await.map_err(ServiceError::db_error)?
                        }
                    };

                    let movement = stock_movement::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        movement_type: Set(MovementType::Receipt),
                        inventory_kind: Set(InventoryKind::Bulk),
                        product_id: Set(saved.product_id.clone()),
                        product_name: Set(saved.product_name.clone()),
                        batch_number: Set(saved.batch_number.clone()),
                        quantity_change: Set(input.quantity),
                        location: Set(saved.location.clone()),
                        reference: Set(reference),
                        reason: Set(None),
                        recorded_by: Set(recorded_by),
                        created_at: Set(now),
                    };
                    movement.insert(txn).await.map_err(ServiceError::db_error)?;

                    Ok(saved)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.event_sender
            .send_logged(Event::InventoryReceived {
                kind: InventoryKind::Bulk,
                product_id: saved.product_id.clone(),
                batch_number: saved.batch_number.clone(),
                quantity: input.quantity,
            })
            .await;

        Ok(saved)
    }

    /// Receive packaged stock; upsert key is product + batch + variant.
    #[instrument(skip(self, input))]
    pub async fn add_packaged_units(
        &self,
        input: PackagedReceiptInput,
        recorded_by: &str,
    ) -> Result<packaged_inventory::Model, ServiceError> {
        input.validate()?;
        if input.units_received <= 0 {
            return Err(ServiceError::ValidationError(
                "Units in Stock must be greater than 0 for packaged products".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let location = self.resolve_location(input.location.as_deref()).await?;
        let reference = input
            .release_code
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| release_code(now));
        let recorded_by = recorded_by.to_string();
        let input_clone = input.clone();
        let reference_clone = reference.clone();

        let saved = db
            .transaction::<_, packaged_inventory::Model, ServiceError>(move |txn| {
                let input = input_clone;
                let reference = reference_clone;
                let location = location.clone();
                let recorded_by = recorded_by.clone();
                Box::pin(async move {
                    let existing = packaged_inventory::Entity::find()
                        .filter(packaged_inventory::Column::ProductId.eq(input.product_id.clone()))
                        .filter(
                            packaged_inventory::Column::BatchNumber
                                .eq(input.batch_number.clone()),
                        )
                        .filter(
                            packaged_inventory::Column::VariantName
                                .eq(input.variant_name.clone()),
                        )
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    let saved = match existing {
                        Some(row) => {
                            let new_units = row.units_in_stock + input.units_received;
                            let mut active: packaged_inventory::ActiveModel = row.into();
                            active.units_in_stock = Set(new_units);
                            active.updated_at = Set(Some(now));
                            active.update(txn).await.map_err(ServiceError::db_error)?
                        }
                        None => {
                            let row = packaged_inventory::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                product_id: Set(input.product_id.clone()),
                                product_name: Set(input.product_name.clone()),
                                variant_name: Set(input.variant_name.clone()),
                                variant_size: Set(input.variant_size.clone()),
                                variant_unit: Set(input.variant_unit.clone()),
                                batch_number: Set(input.batch_number.clone()),
                                units_in_stock: Set(input.units_received),
                                quality_grade: Set(input.quality_grade),
                                expiry_date: Set(input.expiry_date),
                                release_code: Set(reference.clone()),
                                location: Set(location.clone()),
                                received_from: Set(input
                                    .received_from
                                    .clone()
                                    .unwrap_or_else(|| "manual_entry".to_string())),
                                created_at: Set(now),
                                updated_at: Set(None),
                            };
                            row.insert(txn).await.map_err(ServiceError::db_error)?
                        }
                    };

                    let movement = stock_movement::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        movement_type: Set(MovementType::Receipt),
                        inventory_kind: Set(InventoryKind::Packaged),
                        product_id: Set(saved.product_id.clone()),
                        product_name: Set(saved.product_name.clone()),
                        batch_number: Set(saved.batch_number.clone()),
                        quantity_change: Set(Decimal::from(input.units_received)),
                        location: Set(saved.location.clone()),
                        reference: Set(reference),
                        reason: Set(None),
                        recorded_by: Set(recorded_by),
                        created_at: Set(now),
                    };
                    movement.insert(txn).await.map_err(ServiceError::db_error)?;

                    Ok(saved)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.event_sender
            .send_logged(Event::InventoryReceived {
                kind: InventoryKind::Packaged,
                product_id: saved.product_id.clone(),
                batch_number: saved.batch_number.clone(),
                quantity: Decimal::from(input.units_received),
            })
            .await;

        Ok(saved)
    }

    /// Signed manual adjustment of a bulk batch. The quantity may never
    /// drop below zero; batches are retired by reaching zero, not by
    /// deletion.
    #[instrument(skip(self))]
    pub async fn adjust_bulk(
        &self,
        batch_id: Uuid,
        change: Decimal,
        reason: String,
        recorded_by: &str,
    ) -> Result<bulk_inventory::Model, ServiceError> {
        if change == Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Adjustment must be non-zero".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let recorded_by = recorded_by.to_string();
        let reason_clone = reason.clone();

        let saved = db
            .transaction::<_, bulk_inventory::Model, ServiceError>(move |txn| {
                let reason = reason_clone;
                let recorded_by = recorded_by.clone();
                Box::pin(async move {
                    let row = bulk_inventory::Entity::find_by_id(batch_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Bulk batch {} not found", batch_id))
                        })?;

                    let new_quantity = row.quantity + change;
                    if new_quantity < Decimal::ZERO {
                        return Err(ServiceError::ValidationError(format!(
                            "Adjustment would drive batch {} below zero ({} {})",
                            row.batch_number, new_quantity, row.unit
                        )));
                    }

                    let movement = stock_movement::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        movement_type: Set(MovementType::Adjustment),
                        inventory_kind: Set(InventoryKind::Bulk),
                        product_id: Set(row.product_id.clone()),
                        product_name: Set(row.product_name.clone()),
                        batch_number: Set(row.batch_number.clone()),
                        quantity_change: Set(change),
                        location: Set(row.location.clone()),
                        reference: Set(row.release_code.clone()),
                        reason: Set(Some(reason)),
                        recorded_by: Set(recorded_by),
                        created_at: Set(now),
                    };

                    let mut active: bulk_inventory::ActiveModel = row.into();
                    active.quantity = Set(new_quantity);
                    active.updated_at = Set(Some(now));
                    let saved = active.update(txn).await.map_err(ServiceError::db_error)?;

                    movement.insert(txn).await.map_err(ServiceError::db_error)?;

                    Ok(saved)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.event_sender
            .send_logged(Event::InventoryAdjusted {
                kind: InventoryKind::Bulk,
                product_id: saved.product_id.clone(),
                batch_number: saved.batch_number.clone(),
                quantity_change: change,
                reason,
            })
            .await;

        Ok(saved)
    }

    /// Signed manual adjustment of a packaged batch.
    #[instrument(skip(self))]
    pub async fn adjust_packaged(
        &self,
        batch_id: Uuid,
        change: i32,
        reason: String,
        recorded_by: &str,
    ) -> Result<packaged_inventory::Model, ServiceError> {
        if change == 0 {
            return Err(ServiceError::ValidationError(
                "Adjustment must be non-zero".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let recorded_by = recorded_by.to_string();
        let reason_clone = reason.clone();

        let saved = db
            .transaction::<_, packaged_inventory::Model, ServiceError>(move |txn| {
                let reason = reason_clone;
                let recorded_by = recorded_by.clone();
                Box::pin(async move {
                    let row = packaged_inventory::Entity::find_by_id(batch_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Packaged batch {} not found",
                                batch_id
                            ))
                        })?;

                    let new_units = row.units_in_stock + change;
                    if new_units < 0 {
                        return Err(ServiceError::ValidationError(format!(
                            "Adjustment would drive batch {} below zero ({} units)",
                            row.batch_number, new_units
                        )));
                    }

                    let movement = stock_movement::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        movement_type: Set(MovementType::Adjustment),
                        inventory_kind: Set(InventoryKind::Packaged),
                        product_id: Set(row.product_id.clone()),
                        product_name: Set(row.product_name.clone()),
                        batch_number: Set(row.batch_number.clone()),
                        quantity_change: Set(Decimal::from(change)),
                        location: Set(row.location.clone()),
                        reference: Set(row.release_code.clone()),
                        reason: Set(Some(reason)),
                        recorded_by: Set(recorded_by),
                        created_at: Set(now),
                    };

                    let mut active: packaged_inventory::ActiveModel = row.into();
                    active.units_in_stock = Set(new_units);
                    active.updated_at = Set(Some(now));
                    let saved = active.update(txn).await.map_err(ServiceError::db_error)?;

                    movement.insert(txn).await.map_err(ServiceError::db_error)?;

                    Ok(saved)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.event_sender
            .send_logged(Event::InventoryAdjusted {
                kind: InventoryKind::Packaged,
                product_id: saved.product_id.clone(),
                batch_number: saved.batch_number.clone(),
                quantity_change: Decimal::from(change),
                reason,
            })
            .await;

        Ok(saved)
    }

    /// Lists bulk inventory with pagination.
    #[instrument(skip(self))]
    pub async fn list_bulk(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<bulk_inventory::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let paginator = bulk_inventory::Entity::find()
            .order_by_desc(bulk_inventory::Column::CreatedAt)
            .paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((rows, total))
    }

    /// Lists packaged inventory with pagination.
    #[instrument(skip(self))]
    pub async fn list_packaged(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<packaged_inventory::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let paginator = packaged_inventory::Entity::find()
            .order_by_desc(packaged_inventory::Column::CreatedAt)
            .paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((rows, total))
    }

    /// Stock movement log, newest first.
    #[instrument(skip(self))]
    pub async fn list_movements(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<stock_movement::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let paginator = stock_movement::Entity::find()
            .order_by_desc(stock_movement::Column::CreatedAt)
            .paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((rows, total))
    }

    /// Expiry overview across both stock pools: only rows carrying an
    /// expiry date, sorted soonest first.
    #[instrument(skip(self))]
    pub async fn expiry_report(&self, today: NaiveDate) -> Result<ExpiryReport, ServiceError> {
        let db = &*self.db_pool;

        let bulk = bulk_inventory::Entity::find()
            .filter(bulk_inventory::Column::ExpiryDate.is_not_null())
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let packaged = packaged_inventory::Entity::find()
            .filter(packaged_inventory::Column::ExpiryDate.is_not_null())
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut items: Vec<ExpiryItem> = Vec::with_capacity(bulk.len() + packaged.len());

        for row in bulk {
            if let Some(expiry) = row.expiry_date {
                items.push(ExpiryItem {
                    id: row.id,
                    inventory_kind: InventoryKind::Bulk,
                    product_name: row.product_name,
                    batch_number: row.batch_number,
                    location: row.location,
                    expiry_date: expiry,
                    days_to_expiry: (expiry - today).num_days(),
                    status: expiry_status(expiry, today),
                });
            }
        }
        for row in packaged {
            if let Some(expiry) = row.expiry_date {
                items.push(ExpiryItem {
                    id: row.id,
                    inventory_kind: InventoryKind::Packaged,
                    product_name: row.product_name,
                    batch_number: row.batch_number,
                    location: row.location,
                    expiry_date: expiry,
                    days_to_expiry: (expiry - today).num_days(),
                    status: expiry_status(expiry, today),
                });
            }
        }

        items.sort_by_key(|item| item.expiry_date);

        let expired = items.iter().filter(|i| i.status == ExpiryStatus::Expired).count();
        let critical = items.iter().filter(|i| i.status == ExpiryStatus::Critical).count();
        let warning = items.iter().filter(|i| i.status == ExpiryStatus::Warning).count();

        Ok(ExpiryReport {
            total: items.len(),
            expired,
            critical,
            warning,
            items,
        })
    }

    /// Create a storage location; codes are unique.
    #[instrument(skip(self))]
    pub async fn create_location(
        &self,
        code: String,
        name: String,
        capacity: Option<i32>,
    ) -> Result<storage_location::Model, ServiceError> {
        let db = &*self.db_pool;
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ServiceError::ValidationError(
                "Location code is required".to_string(),
            ));
        }

        let existing = storage_location::Entity::find()
            .filter(storage_location::Column::Code.eq(code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Storage location {} already exists",
                code
            )));
        }

        let row = storage_location::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(name),
            capacity: Set(capacity),
            created_at: Set(Utc::now()),
        };
        row.insert(db).await.map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_locations(&self) -> Result<Vec<storage_location::Model>, ServiceError> {
        let db = &*self.db_pool;
        storage_location::Entity::find()
            .order_by_asc(storage_location::Column::Code)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Per-location utilization against capacity, plus store-wide totals.
    #[instrument(skip(self))]
    pub async fn location_stats(&self) -> Result<LocationStats, ServiceError> {
        let db = &*self.db_pool;

        let locations = self.list_locations().await?;
        let mut utilizations = Vec::with_capacity(locations.len());
        let mut total_capacity: i64 = 0;
        let mut used_capacity: u64 = 0;

        for location in locations {
            let bulk_count = bulk_inventory::Entity::find()
                .filter(bulk_inventory::Column::Location.eq(location.code.clone()))
                .count(db)
                .await
                .map_err(ServiceError::db_error)?;
            let packaged_count = packaged_inventory::Entity::find()
                .filter(packaged_inventory::Column::Location.eq(location.code.clone()))
                .count(db)
                .await
                .map_err(ServiceError::db_error)?;

            let item_count = bulk_count + packaged_count;
            let utilization_percent = match location.capacity {
                Some(capacity) if capacity > 0 => {
                    (item_count * 100) / capacity as u64
                }
                _ => {
                    if item_count > 0 {
                        100
                    } else {
                        0
                    }
                }
            };

            total_capacity += i64::from(location.capacity.unwrap_or(0));
            used_capacity += item_count;

            utilizations.push(LocationUtilization {
                id: location.id,
                code: location.code,
                name: location.name,
                capacity: location.capacity,
                item_count,
                utilization_percent,
            });
        }

        let full_locations = utilizations
            .iter()
            .filter(|l| l.utilization_percent >= 100 && l.item_count > 0)
            .count();
        let empty_locations = utilizations.iter().filter(|l| l.item_count == 0).count();
        let utilization_percent = if total_capacity > 0 {
            (used_capacity * 100) / total_capacity as u64
        } else {
            0
        };

        Ok(LocationStats {
            total_locations: utilizations.len(),
            total_capacity,
            used_capacity,
            utilization_percent,
            full_locations,
            empty_locations,
            locations: utilizations,
        })
    }

    /// Map a requested location code onto a known one, falling back to
    /// the configured default for unknown codes.
    async fn resolve_location(&self, requested: Option<&str>) -> Result<String, ServiceError> {
        let db = &*self.db_pool;

        let Some(code) = requested
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
        else {
            return Ok(self.default_location.clone());
        };

        let known = storage_location::Entity::find()
            .filter(storage_location::Column::Code.eq(code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        match known {
            Some(location) => Ok(location.code),
            None => {
                warn!(
                    requested = %code,
                    fallback = %self.default_location,
                    "unknown storage location on receipt"
                );
                Ok(self.default_location.clone())
            }
        }
    }
}

fn unwrap_transaction_error(e: TransactionError<ServiceError>) -> ServiceError {
    match e {
        TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(-1, ExpiryStatus::Expired ; "yesterday is expired")]
    #[test_case(0, ExpiryStatus::Critical ; "today is critical")]
    #[test_case(7, ExpiryStatus::Critical ; "seven days is critical")]
    #[test_case(8, ExpiryStatus::Warning ; "eight days is warning")]
    #[test_case(30, ExpiryStatus::Warning ; "thirty days is warning")]
    #[test_case(31, ExpiryStatus::Good ; "beyond a month is good")]
    fn expiry_classification(offset_days: i64, expected: ExpiryStatus) {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let expiry = today + chrono::Duration::days(offset_days);
        assert_eq!(expiry_status(expiry, today), expected);
    }
}
