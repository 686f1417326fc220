use crate::{
    auth::SessionUser,
    entities::{bulk_inventory, packaged_inventory, stock_movement, storage_location},
    services::inventory::{
        BulkReceiptInput, ExpiryReport, LocationStats, PackagedReceiptInput,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct BulkAdjustmentBody {
    pub change: Decimal,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct PackagedAdjustmentBody {
    pub change: i32,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLocationBody {
    pub code: String,
    pub name: String,
    pub capacity: Option<i32>,
}

fn paging(query: &PageQuery) -> (u64, u64) {
    (
        query.page.unwrap_or(1).max(1),
        query.limit.unwrap_or(20).clamp(1, 100),
    )
}

pub async fn list_bulk(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<bulk_inventory::Model>> {
    let (page, limit) = paging(&query);
    let (items, total) = state.services.inventory.list_bulk(page, limit).await?;
    let total_pages = (total + limit - 1) / limit;
    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn receive_bulk(
    State(state): State<AppState>,
    actor: SessionUser,
    Json(input): Json<BulkReceiptInput>,
) -> ApiResult<bulk_inventory::Model> {
    let saved = state
        .services
        .inventory
        .add_to_inventory(input, &actor.uid)
        .await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn adjust_bulk(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: SessionUser,
    Json(body): Json<BulkAdjustmentBody>,
) -> ApiResult<bulk_inventory::Model> {
    let saved = state
        .services
        .inventory
        .adjust_bulk(id, body.change, body.reason, &actor.uid)
        .await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn list_packaged(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<packaged_inventory::Model>> {
    let (page, limit) = paging(&query);
    let (items, total) = state.services.inventory.list_packaged(page, limit).await?;
    let total_pages = (total + limit - 1) / limit;
    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn receive_packaged(
    State(state): State<AppState>,
    actor: SessionUser,
    Json(input): Json<PackagedReceiptInput>,
) -> ApiResult<packaged_inventory::Model> {
    let saved = state
        .services
        .inventory
        .add_packaged_units(input, &actor.uid)
        .await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn adjust_packaged(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: SessionUser,
    Json(body): Json<PackagedAdjustmentBody>,
) -> ApiResult<packaged_inventory::Model> {
    let saved = state
        .services
        .inventory
        .adjust_packaged(id, body.change, body.reason, &actor.uid)
        .await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<stock_movement::Model>> {
    let (page, limit) = paging(&query);
    let (items, total) = state.services.inventory.list_movements(page, limit).await?;
    let total_pages = (total + limit - 1) / limit;
    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn expiry_report(State(state): State<AppState>) -> ApiResult<ExpiryReport> {
    let report = state
        .services
        .inventory
        .expiry_report(Utc::now().date_naive())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

pub async fn list_locations(
    State(state): State<AppState>,
) -> ApiResult<Vec<storage_location::Model>> {
    let locations = state.services.inventory.list_locations().await?;
    Ok(Json(ApiResponse::success(locations)))
}

pub async fn create_location(
    State(state): State<AppState>,
    _actor: SessionUser,
    Json(body): Json<CreateLocationBody>,
) -> ApiResult<storage_location::Model> {
    let saved = state
        .services
        .inventory
        .create_location(body.code, body.name, body.capacity)
        .await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn location_stats(State(state): State<AppState>) -> ApiResult<LocationStats> {
    let stats = state.services.inventory.location_stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}
