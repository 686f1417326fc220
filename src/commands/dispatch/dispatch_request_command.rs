use crate::{
    commands::Command,
    db::DbPool,
    entities::{approval_history, bulk_inventory, dispatch_record, packaged_inventory, stock_movement},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{release_code, InventoryKind, MovementType, RequestItems},
};
use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref DISPATCH_COMMITS: IntCounter = register_int_counter!(
        "dispatch_commits_total",
        "Total number of dispatches committed"
    )
    .expect("metric can be created");
    static ref DISPATCH_FAILURES: IntCounter = register_int_counter!(
        "dispatch_failures_total",
        "Total number of failed dispatch submissions"
    )
    .expect("metric can be created");
}

/// One batch the operator draws stock from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSelection {
    pub batch_id: Uuid,
    pub inventory_kind: InventoryKind,
    pub quantity: i32,
}

/// Operator-chosen allocation for one requested item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchItemInput {
    pub name: String,
    /// Bounded to [0, approved qty]; items left at 0 are omitted.
    pub dispatch_qty: i32,
    #[serde(default)]
    pub batches: Vec<BatchSelection>,
}

/// Maps an approved request's items onto concrete inventory batches and
/// commits the decrement, the movement log rows, and the dispatch record
/// as one transaction. The allocation invariant (per-item batch total ==
/// dispatch quantity, exactly) is checked again inside the transaction:
/// the submitting client's inventory snapshot may be stale.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DispatchRequestCommand {
    pub history_id: Uuid,
    pub items: BTreeMap<String, DispatchItemInput>,
    #[validate(length(min = 1, message = "Dispatcher id is required"))]
    pub dispatched_by: String,
    pub dispatched_by_name: String,
    pub dispatched_by_role: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequestResult {
    pub dispatch_id: Uuid,
    pub history_id: Uuid,
    pub reference_code: String,
    pub dispatched_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommittedBatch {
    batch_id: Uuid,
    batch_number: String,
    location: String,
    inventory_type: InventoryKind,
    quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommittedItem {
    name: String,
    qty: i32,
    batches: Vec<CommittedBatch>,
}

/// Exact-match allocation check. Returns one message per failing item;
/// an empty result means the submission is internally consistent.
pub fn validate_allocations(items: &BTreeMap<String, DispatchItemInput>) -> Vec<String> {
    let mut errors = Vec::new();

    for item in items.values() {
        if item.dispatch_qty < 0 {
            errors.push(format!("{}: Dispatch quantity cannot be negative", item.name));
            continue;
        }
        if item.dispatch_qty == 0 {
            continue;
        }

        if item.batches.iter().any(|b| b.quantity <= 0) {
            errors.push(format!("{}: Batch quantities must be positive", item.name));
            continue;
        }

        let total_selected: i32 = item.batches.iter().map(|b| b.quantity).sum();

        if total_selected == 0 {
            errors.push(format!("{}: No batches selected", item.name));
        } else if total_selected < item.dispatch_qty {
            errors.push(format!(
                "{}: Selected {}, need {}",
                item.name, total_selected, item.dispatch_qty
            ));
        } else if total_selected > item.dispatch_qty {
            errors.push(format!(
                "{}: Selected {}, only need {}",
                item.name, total_selected, item.dispatch_qty
            ));
        }
    }

    errors
}

#[async_trait::async_trait]
impl Command for DispatchRequestCommand {
    type Result = DispatchRequestResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            DISPATCH_FAILURES.inc();
            ServiceError::ValidationError(format!("Invalid input: {}", e))
        })?;

        let allocation_errors = validate_allocations(&self.items);
        if !allocation_errors.is_empty() {
            DISPATCH_FAILURES.inc();
            return Err(ServiceError::ValidationError(allocation_errors.join("\n")));
        }

        if !self.items.values().any(|item| item.dispatch_qty > 0) {
            DISPATCH_FAILURES.inc();
            return Err(ServiceError::ValidationError(
                "Nothing to dispatch: all quantities are zero".to_string(),
            ));
        }

        let db = db_pool.as_ref();
        let dispatch_id = Uuid::new_v4();
        let now = Utc::now();
        let reference_code = release_code(now);
        let command = self.clone();
        let reference = reference_code.clone();

        let dispatched_items = db
            .transaction::<_, usize, ServiceError>(move |txn| {
                Box::pin(async move {
                    let history = approval_history::Entity::find_by_id(command.history_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Approved request {} not found",
                                command.history_id
                            ))
                        })?;

                    if history.is_dispatched {
                        return Err(ServiceError::InvalidOperation(format!(
                            "Request {} has already been dispatched",
                            command.history_id
                        )));
                    }

                    let approved_items =
                        RequestItems::from_json(&history.items).ok_or_else(|| {
                            ServiceError::InternalError(format!(
                                "History record {} carries unreadable items",
                                history.id
                            ))
                        })?;

                    let mut committed: BTreeMap<String, CommittedItem> = BTreeMap::new();

                    for (item_id, input) in &command.items {
                        if input.dispatch_qty == 0 {
                            continue;
                        }

                        let approved = approved_items.0.get(item_id).ok_or_else(|| {
                            ServiceError::ValidationError(format!(
                                "{}: not part of the approved request",
                                input.name
                            ))
                        })?;

                        if Decimal::from(input.dispatch_qty) > approved.qty {
                            return Err(ServiceError::ValidationError(format!(
                                "{}: dispatch quantity {} exceeds approved {}",
                                input.name, input.dispatch_qty, approved.qty
                            )));
                        }

                        let mut batches = Vec::with_capacity(input.batches.len());
                        for selection in &input.batches {
                            let batch = draw_from_batch(
                                txn,
                                selection,
                                &input.name,
                                &reference,
                                &command.dispatched_by,
                                now,
                            )
                            .await?;
                            batches.push(batch);
                        }

                        committed.insert(
                            item_id.clone(),
                            CommittedItem {
                                name: input.name.clone(),
                                qty: input.dispatch_qty,
                                batches,
                            },
                        );
                    }

                    let record = dispatch_record::ActiveModel {
                        id: Set(dispatch_id),
                        history_id: Set(command.history_id),
                        items: Set(serde_json::to_value(&committed)
                            .map_err(|e| ServiceError::SerializationError(e.to_string()))?),
                        reference_code: Set(reference.clone()),
                        dispatched_by: Set(command.dispatched_by.clone()),
                        dispatched_by_name: Set(command.dispatched_by_name.clone()),
                        dispatched_by_role: Set(command.dispatched_by_role.clone()),
                        notes: Set(command
                            .notes
                            .clone()
                            .map(|n| n.trim().to_string())
                            .filter(|n| !n.is_empty())),
                        created_at: Set(now),
                    };
                    record.insert(txn).await.map_err(ServiceError::db_error)?;

                    let mut history_active: approval_history::ActiveModel = history.into();
                    history_active.is_dispatched = Set(true);
                    history_active
                        .update(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    Ok(committed.len())
                })
            })
            .await
            .map_err(|e| {
                DISPATCH_FAILURES.inc();
                match e {
                    TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                    TransactionError::Transaction(service_err) => service_err,
                }
            })?;

        info!(
            dispatch_id = %dispatch_id,
            history_id = %self.history_id,
            reference_code = %reference_code,
            items = dispatched_items,
            "Dispatch committed"
        );

        event_sender
            .send_logged(Event::RequestDispatched {
                history_id: self.history_id,
                dispatch_id,
                reference_code: reference_code.clone(),
            })
            .await;

        DISPATCH_COMMITS.inc();

        Ok(DispatchRequestResult {
            dispatch_id,
            history_id: self.history_id,
            reference_code,
            dispatched_items,
        })
    }
}

/// Decrement one batch and log the movement. Fails the surrounding
/// transaction when the batch is missing or short of stock.
async fn draw_from_batch<C>(
    txn: &C,
    selection: &BatchSelection,
    product_name: &str,
    reference: &str,
    recorded_by: &str,
    now: chrono::DateTime<Utc>,
) -> Result<CommittedBatch, ServiceError>
where
    C: sea_orm::ConnectionTrait,
{
    let needed = selection.quantity;

    match selection.inventory_kind {
        InventoryKind::Bulk => {
            let batch = bulk_inventory::Entity::find_by_id(selection.batch_id)
                .one(txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "{}: bulk batch {} not found",
                        product_name, selection.batch_id
                    ))
                })?;

            let needed_qty = Decimal::from(needed);
            if batch.quantity < needed_qty {
                return Err(ServiceError::InsufficientStock(format!(
                    "{}: batch {} has {}, need {}",
                    product_name, batch.batch_number, batch.quantity, needed_qty
                )));
            }

            let committed = CommittedBatch {
                batch_id: batch.id,
                batch_number: batch.batch_number.clone(),
                location: batch.location.clone(),
                inventory_type: InventoryKind::Bulk,
                quantity: needed,
            };

            let movement = stock_movement::ActiveModel {
                id: Set(Uuid::new_v4()),
                movement_type: Set(MovementType::Dispatch),
                inventory_kind: Set(InventoryKind::Bulk),
                product_id: Set(batch.product_id.clone()),
                product_name: Set(batch.product_name.clone()),
                batch_number: Set(batch.batch_number.clone()),
                quantity_change: Set(-needed_qty),
                location: Set(batch.location.clone()),
                reference: Set(reference.to_string()),
                reason: Set(None),
                recorded_by: Set(recorded_by.to_string()),
                created_at: Set(now),
            };

            let remaining = batch.quantity - needed_qty;
            let mut active: bulk_inventory::ActiveModel = batch.into();
            active.quantity = Set(remaining);
            active.updated_at = Set(Some(now));
            active.update(txn).await.map_err(ServiceError::db_error)?;

            movement.insert(txn).await.map_err(ServiceError::db_error)?;

            Ok(committed)
        }
        InventoryKind::Packaged => {
            let batch = packaged_inventory::Entity::find_by_id(selection.batch_id)
                .one(txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "{}: packaged batch {} not found",
                        product_name, selection.batch_id
                    ))
                })?;

            if batch.units_in_stock < needed {
                return Err(ServiceError::InsufficientStock(format!(
                    "{}: batch {} has {}, need {}",
                    product_name, batch.batch_number, batch.units_in_stock, needed
                )));
            }

            let committed = CommittedBatch {
                batch_id: batch.id,
                batch_number: batch.batch_number.clone(),
                location: batch.location.clone(),
                inventory_type: InventoryKind::Packaged,
                quantity: needed,
            };

            let movement = stock_movement::ActiveModel {
                id: Set(Uuid::new_v4()),
                movement_type: Set(MovementType::Dispatch),
                inventory_kind: Set(InventoryKind::Packaged),
                product_id: Set(batch.product_id.clone()),
                product_name: Set(batch.product_name.clone()),
                batch_number: Set(batch.batch_number.clone()),
                quantity_change: Set(Decimal::from(-needed)),
                location: Set(batch.location.clone()),
                reference: Set(reference.to_string()),
                reason: Set(None),
                recorded_by: Set(recorded_by.to_string()),
                created_at: Set(now),
            };

            let remaining = batch.units_in_stock - needed;
            let mut active: packaged_inventory::ActiveModel = batch.into();
            active.units_in_stock = Set(remaining);
            active.updated_at = Set(Some(now));
            active.update(txn).await.map_err(ServiceError::db_error)?;

            movement.insert(txn).await.map_err(ServiceError::db_error)?;

            Ok(committed)
        }
    }
}
