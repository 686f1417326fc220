use crate::{
    commands::approvals::ApproveRequestResult,
    db::DbPool,
    entities::{notification, user},
    errors::ServiceError,
    events::{Event, EventSender},
    models::NotificationStatus,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub const APPROVED_SALES_REQUEST: &str = "approved_sales_request";

/// Per-user notification records. Fan-out is best-effort: callers treat
/// failures as log-worthy, not as operation failures. There is no
/// deduplication and no delivery guarantee beyond the stored row.
#[derive(Clone)]
pub struct NotificationService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl NotificationService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Append one notification per user holding `role`. Returns the
    /// number of users notified.
    #[instrument(skip(self, message, data))]
    pub async fn notify_role(
        &self,
        role: &str,
        notification_type: &str,
        message: String,
        data: serde_json::Value,
    ) -> Result<usize, ServiceError> {
        let db = &*self.db_pool;

        let recipients = user::Entity::find()
            .filter(user::Column::Role.eq(role))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let now = Utc::now();
        for recipient in &recipients {
            let record = notification::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(recipient.id.clone()),
                notification_type: Set(notification_type.to_string()),
                message: Set(message.clone()),
                data: Set(data.clone()),
                status: Set(NotificationStatus::Unread),
                created_at: Set(now),
            };
            record.insert(db).await.map_err(ServiceError::db_error)?;

            self.event_sender
                .send_logged(Event::NotificationQueued {
                    user_id: recipient.id.clone(),
                })
                .await;
        }

        info!(
            role = %role,
            recipients = recipients.len(),
            "notification fan-out complete"
        );

        Ok(recipients.len())
    }

    /// Fan-out for a fresh approval, addressed to the consuming
    /// department.
    pub async fn notify_approved_request(
        &self,
        role: &str,
        approval: &ApproveRequestResult,
    ) -> Result<usize, ServiceError> {
        let message = format!(
            "New approved {} request ready for dispatch: {}",
            approval.requester_role, approval.requester_name
        );
        let data = json!({
            "request_type": "approved_sales",
            "history_id": approval.history_id,
            "requester_name": approval.requester_name,
            "requester_role": approval.requester_role,
            "total_items": approval.items.len(),
            "total_quantity": approval.total_quantity,
            "priority": approval.priority,
        });

        self.notify_role(role, APPROVED_SALES_REQUEST, message, data)
            .await
    }

    /// Newest-first listing for one user.
    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> Result<Vec<notification::Model>, ServiceError> {
        let db = &*self.db_pool;
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: &str) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::Status.eq(NotificationStatus::Unread))
            .count(db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, notification_id: Uuid, user_id: &str) -> Result<(), ServiceError> {
        self.set_status(notification_id, user_id, NotificationStatus::Read)
            .await
    }

    #[instrument(skip(self))]
    pub async fn mark_unread(
        &self,
        notification_id: Uuid,
        user_id: &str,
    ) -> Result<(), ServiceError> {
        self.set_status(notification_id, user_id, NotificationStatus::Unread)
            .await
    }

    async fn set_status(
        &self,
        notification_id: Uuid,
        user_id: &str,
        status: NotificationStatus,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let record = notification::Entity::find_by_id(notification_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Notification {} not found", notification_id))
            })?;

        let mut active: notification::ActiveModel = record.into();
        active.status = Set(status);
        active.update(db).await.map_err(ServiceError::db_error)?;
        Ok(())
    }
}
