use crate::{
    auth::SessionUser,
    entities::notification,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct NotificationQuery {
    pub limit: Option<u64>,
}

/// Notifications for the calling user, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Vec<notification::Model>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let notifications = state
        .services
        .notifications
        .list_for_user(&user.uid, limit)
        .await?;
    Ok(Json(ApiResponse::success(notifications)))
}

pub async fn unread_count(
    State(state): State<AppState>,
    user: SessionUser,
) -> ApiResult<serde_json::Value> {
    let count = state.services.notifications.unread_count(&user.uid).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "unread": count
    }))))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: SessionUser,
) -> ApiResult<serde_json::Value> {
    state.services.notifications.mark_read(id, &user.uid).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "notification_id": id,
        "status": "read"
    }))))
}

pub async fn mark_unread(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: SessionUser,
) -> ApiResult<serde_json::Value> {
    state
        .services
        .notifications
        .mark_unread(id, &user.uid)
        .await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "notification_id": id,
        "status": "unread"
    }))))
}
