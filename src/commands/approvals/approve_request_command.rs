use crate::{
    commands::Command,
    db::DbPool,
    entities::{approval_history, sales_request},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{RequestItems, RequestStatus},
};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref REQUEST_APPROVALS: IntCounter = register_int_counter!(
        "sales_request_approvals_total",
        "Total number of sales requests approved"
    )
    .expect("metric can be created");
    static ref REQUEST_APPROVAL_FAILURES: IntCounter = register_int_counter!(
        "sales_request_approval_failures_total",
        "Total number of failed sales request approvals"
    )
    .expect("metric can be created");
}

/// Moves one pending sales request to Approved and writes the immutable
/// approval-history snapshot in the same transaction. Notification
/// fan-out happens after this command succeeds and is not part of it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApproveRequestCommand {
    pub request_id: Uuid,
    #[validate(length(min = 1, message = "Approver id is required"))]
    pub approved_by: String,
    pub approver_name: String,
    pub approver_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveRequestResult {
    pub request_id: Uuid,
    pub history_id: Uuid,
    pub items: RequestItems,
    pub total_quantity: Decimal,
    pub requester_name: String,
    pub requester_role: String,
    pub priority: String,
}

#[async_trait::async_trait]
impl Command for ApproveRequestCommand {
    type Result = ApproveRequestResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            REQUEST_APPROVAL_FAILURES.inc();
            ServiceError::ValidationError(format!("Invalid input: {}", e))
        })?;

        let db = db_pool.as_ref();

        let request = sales_request::Entity::find_by_id(self.request_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(request_id = %self.request_id, error = %e, "Database error when fetching request");
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| {
                REQUEST_APPROVAL_FAILURES.inc();
                ServiceError::NotFound(format!("Request {} not found", self.request_id))
            })?;

        if request.status != RequestStatus::Pending {
            REQUEST_APPROVAL_FAILURES.inc();
            return Err(ServiceError::InvalidOperation(format!(
                "Request {} is already {}",
                self.request_id, request.status
            )));
        }

        // Fatal when the record carries no discoverable items; the request
        // is left untouched.
        let items = RequestItems::normalize(
            request.items.as_ref(),
            request.product.as_deref(),
            request.quantity.as_ref(),
            request.products.as_ref(),
        )
        .map_err(|_| {
            REQUEST_APPROVAL_FAILURES.inc();
            error!(request_id = %self.request_id, "cannot approve request: no items found");
            ServiceError::NoItemsFound
        })?;

        let total_quantity = items.total_quantity();
        let history_id = Uuid::new_v4();
        let now = Utc::now();

        self.persist_approval(db, &request, &items, total_quantity, history_id, now)
            .await?;

        self.verify_history_write(db, history_id, &event_sender)
            .await;

        let result = ApproveRequestResult {
            request_id: self.request_id,
            history_id,
            items,
            total_quantity,
            requester_name: request.requested_by_name.clone(),
            requester_role: request.requester_role.clone(),
            priority: request.priority.clone(),
        };

        self.log_and_trigger_event(&event_sender, &result).await?;

        REQUEST_APPROVALS.inc();

        Ok(result)
    }
}

impl ApproveRequestCommand {
    /// Status change and history append commit together or not at all.
    async fn persist_approval(
        &self,
        db: &DbPool,
        request: &sales_request::Model,
        items: &RequestItems,
        total_quantity: Decimal,
        history_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let request_id = self.request_id;
        let approved_by = self.approved_by.clone();
        let approver_name = self.approver_name.clone();
        let approver_role = self.approver_role.clone();
        let request = request.clone();
        let items_json = items.to_json();

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let mut active: sales_request::ActiveModel = request.clone().into();
                active.status = Set(RequestStatus::Approved);
                active.approved_by = Set(Some(approved_by.clone()));
                active.approver_name = Set(Some(approver_name.clone()));
                active.approver_role = Set(Some(approver_role.clone()));
                active.approved_at = Set(Some(now));
                active.updated_at = Set(Some(now));
                active.update(txn).await.map_err(|e| {
                    error!(request_id = %request_id, error = %e, "Failed to update request status");
                    ServiceError::db_error(e)
                })?;

                let shop_name = request
                    .shop_name
                    .clone()
                    .unwrap_or_else(|| request.requested_by_name.clone());

                let history = approval_history::ActiveModel {
                    id: Set(history_id),
                    request_id: Set(request_id),
                    items: Set(items_json),
                    total_quantity: Set(total_quantity),
                    requester_id: Set(request.requested_by.clone()),
                    requester_name: Set(request.requested_by_name.clone()),
                    requester_role: Set(request.requester_role.clone()),
                    request_type: Set(request.request_type.clone()),
                    record_type: Set(request.request_type.history_record_type().to_string()),
                    priority: Set(request.priority.clone()),
                    notes: Set(request.notes.clone()),
                    status: Set(RequestStatus::Approved),
                    approved_by: Set(approved_by),
                    approver_name: Set(approver_name),
                    approver_role: Set(approver_role),
                    approved_at: Set(now),
                    is_dispatched: Set(false),
                    is_completed_by_fg: Set(false),
                    shop_name: Set(shop_name),
                };
                history.insert(txn).await.map_err(|e| {
                    error!(request_id = %request_id, error = %e, "Failed to append approval history");
                    ServiceError::db_error(e)
                })?;

                Ok(())
            })
        })
        .await
        .map_err(|e| {
            REQUEST_APPROVAL_FAILURES.inc();
            match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            }
        })
    }

    /// Read the history row back after commit. A missing row is reported
    /// and alerted but does not undo the terminal status.
    async fn verify_history_write(
        &self,
        db: &DbPool,
        history_id: Uuid,
        event_sender: &EventSender,
    ) {
        match approval_history::Entity::find_by_id(history_id).one(db).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                error!(
                    request_id = %self.request_id,
                    history_id = %history_id,
                    "approval history record missing on read-back"
                );
                event_sender
                    .send_logged(Event::HistoryVerificationFailed {
                        request_id: self.request_id,
                        history_id,
                    })
                    .await;
            }
            Err(e) => {
                warn!(
                    request_id = %self.request_id,
                    history_id = %history_id,
                    error = %e,
                    "could not verify approval history record"
                );
            }
        }
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        result: &ApproveRequestResult,
    ) -> Result<(), ServiceError> {
        info!(
            request_id = %result.request_id,
            history_id = %result.history_id,
            total_quantity = %result.total_quantity,
            "Sales request approved"
        );

        event_sender
            .send(Event::RequestApproved {
                request_id: result.request_id,
                history_id: result.history_id,
                total_quantity: result.total_quantity,
            })
            .await
            .map_err(|e| {
                REQUEST_APPROVAL_FAILURES.inc();
                let msg = format!("Failed to send event for approved request: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
