use crate::{
    auth::SessionUser,
    commands::approvals::{ApproveRequestCommand, ApproveRequestResult, RejectRequestCommand},
    commands::Command,
    db::DbPool,
    entities::{approval_history, sales_request},
    errors::ServiceError,
    events::EventSender,
    models::RequestStatus,
    services::notifications::NotificationService,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::{error, instrument, warn};
use uuid::Uuid;

/// Service for the sales-request approval workflow.
#[derive(Clone)]
pub struct ApprovalService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    notifications: Arc<NotificationService>,
    /// Role whose users are notified when an approval lands.
    notify_role: String,
}

impl ApprovalService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        notifications: Arc<NotificationService>,
        notify_role: String,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            notifications,
            notify_role,
        }
    }

    /// Approve a pending request. The status change and history append
    /// commit atomically; the notification fan-out afterwards is
    /// best-effort and never undoes the approval.
    #[instrument(skip(self, approver))]
    pub async fn approve(
        &self,
        request_id: Uuid,
        approver: &SessionUser,
    ) -> Result<ApproveRequestResult, ServiceError> {
        let command = ApproveRequestCommand {
            request_id,
            approved_by: approver.uid.clone(),
            approver_name: approver.display_name.clone(),
            approver_role: approver.role.clone(),
        };

        let result = command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;

        if let Err(e) = self
            .notifications
            .notify_approved_request(&self.notify_role, &result)
            .await
        {
            warn!(
                request_id = %request_id,
                role = %self.notify_role,
                error = %e,
                "notification fan-out failed; approval stands"
            );
        }

        Ok(result)
    }

    #[instrument(skip(self, rejecter))]
    pub async fn reject(
        &self,
        request_id: Uuid,
        reason: Option<String>,
        rejecter: &SessionUser,
    ) -> Result<(), ServiceError> {
        let command = RejectRequestCommand {
            request_id,
            rejected_by: rejecter.uid.clone(),
            reason,
        };

        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Gets a request by ID
    #[instrument(skip(self))]
    pub async fn get_request(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<sales_request::Model>, ServiceError> {
        let db = &*self.db_pool;
        sales_request::Entity::find_by_id(*request_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(request_id = %request_id, error = %e, "Database error when fetching request");
                ServiceError::db_error(e)
            })
    }

    /// Lists requests with pagination, newest first, optionally filtered
    /// by status.
    #[instrument(skip(self))]
    pub async fn list_requests(
        &self,
        page: u64,
        limit: u64,
        status: Option<RequestStatus>,
    ) -> Result<(Vec<sales_request::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = sales_request::Entity::find()
            .order_by_desc(sales_request::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(sales_request::Column::Status.eq(status));
        }

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let requests = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((requests, total))
    }

    #[instrument(skip(self))]
    pub async fn get_history(
        &self,
        history_id: &Uuid,
    ) -> Result<Option<approval_history::Model>, ServiceError> {
        let db = &*self.db_pool;
        approval_history::Entity::find_by_id(*history_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Lists approval-history records, newest approval first, optionally
    /// filtered on the dispatched flag.
    #[instrument(skip(self))]
    pub async fn list_history(
        &self,
        page: u64,
        limit: u64,
        dispatched: Option<bool>,
    ) -> Result<(Vec<approval_history::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = approval_history::Entity::find()
            .order_by_desc(approval_history::Column::ApprovedAt);
        if let Some(dispatched) = dispatched {
            query = query.filter(approval_history::Column::IsDispatched.eq(dispatched));
        }

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let records = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((records, total))
    }
}
