use crate::{
    commands::Command,
    db::DbPool,
    entities::sales_request,
    errors::ServiceError,
    events::{Event, EventSender},
    models::RequestStatus,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Single terminal transition to Rejected. No history record and no
/// notification is produced for rejections.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RejectRequestCommand {
    pub request_id: Uuid,
    #[validate(length(min = 1, message = "Rejecter id is required"))]
    pub rejected_by: String,
    pub reason: Option<String>,
}

#[async_trait::async_trait]
impl Command for RejectRequestCommand {
    type Result = ();

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(format!("Invalid input: {}", e)))?;

        let db = db_pool.as_ref();

        let request = sales_request::Entity::find_by_id(self.request_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(request_id = %self.request_id, error = %e, "Database error when fetching request");
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {} not found", self.request_id)))?;

        if request.status != RequestStatus::Pending {
            return Err(ServiceError::InvalidOperation(format!(
                "Request {} is already {}",
                self.request_id, request.status
            )));
        }

        let now = Utc::now();
        let mut active: sales_request::ActiveModel = request.into();
        active.status = Set(RequestStatus::Rejected);
        active.rejected_by = Set(Some(self.rejected_by.clone()));
        active.rejection_reason = Set(Some(
            self.reason
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "Request rejected".to_string()),
        ));
        active.rejected_at = Set(Some(now));
        active.updated_at = Set(Some(now));
        active.update(db).await.map_err(|e| {
            error!(request_id = %self.request_id, error = %e, "Failed to reject request");
            ServiceError::db_error(e)
        })?;

        info!(request_id = %self.request_id, "Sales request rejected");

        event_sender
            .send_logged(Event::RequestRejected {
                request_id: self.request_id,
            })
            .await;

        Ok(())
    }
}
