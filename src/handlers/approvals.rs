use crate::{
    auth::SessionUser,
    commands::approvals::ApproveRequestResult,
    entities::{approval_history, sales_request},
    errors::ServiceError,
    models::RequestStatus,
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct RequestListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Optional status filter: Pending, Approved, or Rejected.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub dispatched: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RejectRequestBody {
    pub reason: Option<String>,
}

fn parse_status(raw: &str) -> Result<RequestStatus, ServiceError> {
    match raw.to_ascii_lowercase().as_str() {
        "pending" => Ok(RequestStatus::Pending),
        "approved" => Ok(RequestStatus::Approved),
        "rejected" => Ok(RequestStatus::Rejected),
        other => Err(ServiceError::InvalidInput(format!(
            "Unknown request status: {}",
            other
        ))),
    }
}

pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> ApiResult<PaginatedResponse<sales_request::Model>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let status = query.status.as_deref().map(parse_status).transpose()?;

    let (items, total) = state
        .services
        .approvals
        .list_requests(page, limit, status)
        .await?;
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<sales_request::Model> {
    match state.services.approvals.get_request(&id).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!("Request {} not found", id))),
    }
}

pub async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    approver: SessionUser,
) -> ApiResult<ApproveRequestResult> {
    let result = state.services.approvals.approve(id, &approver).await?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    rejecter: SessionUser,
    Json(body): Json<RejectRequestBody>,
) -> ApiResult<serde_json::Value> {
    state
        .services
        .approvals
        .reject(id, body.reason, &rejecter)
        .await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "request_id": id,
        "status": "Rejected"
    }))))
}

pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryListQuery>,
) -> ApiResult<PaginatedResponse<approval_history::Model>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (items, total) = state
        .services
        .approvals
        .list_history(page, limit, query.dispatched)
        .await?;
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<approval_history::Model> {
    match state.services.approvals.get_history(&id).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!(
            "Approval record {} not found",
            id
        ))),
    }
}
