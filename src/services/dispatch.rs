use crate::{
    auth::SessionUser,
    commands::dispatch::{DispatchItemInput, DispatchRequestCommand, DispatchRequestResult},
    commands::Command,
    db::DbPool,
    entities::{approval_history, bulk_inventory, dispatch_record, packaged_inventory},
    errors::ServiceError,
    events::EventSender,
    models::RequestItems,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Stock visible to the allocator for one requested item: batches of the
/// matching product with anything left in them.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableInventory {
    pub bulk: Vec<bulk_inventory::Model>,
    pub packaged: Vec<packaged_inventory::Model>,
}

/// Service for dispatching approved sales requests against inventory
/// batches.
#[derive(Clone)]
pub struct DispatchService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl DispatchService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Commit a dispatch submission. Validation and the inventory
    /// decrement happen inside one transaction; any failing item rejects
    /// the whole submission.
    #[instrument(skip(self, items, dispatcher))]
    pub async fn dispatch(
        &self,
        history_id: Uuid,
        items: BTreeMap<String, DispatchItemInput>,
        notes: Option<String>,
        dispatcher: &SessionUser,
    ) -> Result<DispatchRequestResult, ServiceError> {
        let command = DispatchRequestCommand {
            history_id,
            items,
            dispatched_by: dispatcher.uid.clone(),
            dispatched_by_name: dispatcher.display_name.clone(),
            dispatched_by_role: dispatcher.role.clone(),
            notes,
        };

        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Snapshot of batches able to satisfy each item of an approved
    /// request, keyed by item id. Product matching is by exact name.
    #[instrument(skip(self))]
    pub async fn available_inventory(
        &self,
        history_id: Uuid,
    ) -> Result<BTreeMap<String, AvailableInventory>, ServiceError> {
        let db = &*self.db_pool;

        let history = approval_history::Entity::find_by_id(history_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Approved request {} not found", history_id))
            })?;

        let items = RequestItems::from_json(&history.items).ok_or_else(|| {
            ServiceError::InternalError(format!(
                "History record {} carries unreadable items",
                history_id
            ))
        })?;

        let mut snapshot = BTreeMap::new();
        for (item_id, item) in &items.0 {
            let bulk = bulk_inventory::Entity::find()
                .filter(bulk_inventory::Column::ProductName.eq(item.name.clone()))
                .filter(bulk_inventory::Column::Quantity.gt(Decimal::ZERO))
                .all(db)
                .await
                .map_err(ServiceError::db_error)?;

            let packaged = packaged_inventory::Entity::find()
                .filter(packaged_inventory::Column::ProductName.eq(item.name.clone()))
                .filter(packaged_inventory::Column::UnitsInStock.gt(0))
                .all(db)
                .await
                .map_err(ServiceError::db_error)?;

            snapshot.insert(item_id.clone(), AvailableInventory { bulk, packaged });
        }

        Ok(snapshot)
    }

    /// Lists dispatch records with pagination, newest first.
    #[instrument(skip(self))]
    pub async fn list_dispatches(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<dispatch_record::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let paginator = dispatch_record::Entity::find()
            .order_by_desc(dispatch_record::Column::CreatedAt)
            .paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let records = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((records, total))
    }

    #[instrument(skip(self))]
    pub async fn get_dispatch(
        &self,
        dispatch_id: &Uuid,
    ) -> Result<Option<dispatch_record::Model>, ServiceError> {
        let db = &*self.db_pool;
        dispatch_record::Entity::find_by_id(*dispatch_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }
}
