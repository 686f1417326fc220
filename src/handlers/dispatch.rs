use crate::{
    auth::SessionUser,
    commands::dispatch::{DispatchItemInput, DispatchRequestResult},
    entities::dispatch_record,
    errors::ServiceError,
    services::dispatch::AvailableInventory,
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct DispatchSubmission {
    pub history_id: Uuid,
    pub items: BTreeMap<String, DispatchItemInput>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DispatchListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn submit_dispatch(
    State(state): State<AppState>,
    dispatcher: SessionUser,
    Json(payload): Json<DispatchSubmission>,
) -> ApiResult<DispatchRequestResult> {
    let result = state
        .services
        .dispatch
        .dispatch(payload.history_id, payload.items, payload.notes, &dispatcher)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// Batches able to satisfy each item of an approved request.
pub async fn available_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<BTreeMap<String, AvailableInventory>> {
    let snapshot = state.services.dispatch.available_inventory(id).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

pub async fn list_dispatches(
    State(state): State<AppState>,
    Query(query): Query<DispatchListQuery>,
) -> ApiResult<PaginatedResponse<dispatch_record::Model>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (items, total) = state.services.dispatch.list_dispatches(page, limit).await?;
    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn get_dispatch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<dispatch_record::Model> {
    match state.services.dispatch.get_dispatch(&id).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!(
            "Dispatch {} not found",
            id
        ))),
    }
}
