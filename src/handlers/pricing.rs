use crate::{
    auth::SessionUser,
    entities::{price_history, product_price},
    errors::ServiceError,
    services::pricing::{PriceUpdateInput, PricingAnalytics},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub product_key: Option<String>,
}

pub async fn list_prices(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<product_price::Model>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    let (items, total) = state.services.pricing.list_prices(page, limit).await?;
    let total_pages = (total + limit - 1) / limit;
    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn get_price(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<product_price::Model> {
    match state.services.pricing.get_price(&key).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!(
            "No price recorded for {}",
            key
        ))),
    }
}

pub async fn update_price(
    State(state): State<AppState>,
    Path(key): Path<String>,
    actor: SessionUser,
    Json(input): Json<PriceUpdateInput>,
) -> ApiResult<product_price::Model> {
    let saved = state
        .services
        .pricing
        .update_price(&key, input, &actor.uid)
        .await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<PaginatedResponse<price_history::Model>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    let (items, total) = state
        .services
        .pricing
        .list_history(query.product_key.as_deref(), page, limit)
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

pub async fn analytics(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<PricingAnalytics> {
    let analytics = state.services.pricing.analytics(&key).await?;
    Ok(Json(ApiResponse::success(analytics)))
}
