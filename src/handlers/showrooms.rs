use crate::{
    auth::SessionUser,
    entities::{showroom, user},
    errors::ServiceError,
    services::showrooms::{CreateShowroomInput, ShowroomStats, UpdateShowroomInput},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct AssignManagerBody {
    pub manager_id: String,
}

pub async fn list_showrooms(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<showroom::Model>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (items, total) = state.services.showrooms.list(page, limit).await?;
    let total_pages = (total + limit - 1) / limit;
    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

pub async fn list_active_showrooms(
    State(state): State<AppState>,
) -> ApiResult<Vec<showroom::Model>> {
    let showrooms = state.services.showrooms.list_active().await?;
    Ok(Json(ApiResponse::success(showrooms)))
}

pub async fn get_showroom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<showroom::Model> {
    match state.services.showrooms.get(&id).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!("Showroom {} not found", id))),
    }
}

pub async fn get_showroom_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<showroom::Model> {
    match state.services.showrooms.get_by_code(&code).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!(
            "Showroom with code {} not found",
            code
        ))),
    }
}

pub async fn create_showroom(
    State(state): State<AppState>,
    creator: SessionUser,
    Json(input): Json<CreateShowroomInput>,
) -> ApiResult<showroom::Model> {
    let saved = state.services.showrooms.create(input, &creator).await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn update_showroom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _actor: SessionUser,
    Json(updates): Json<UpdateShowroomInput>,
) -> ApiResult<showroom::Model> {
    let saved = state.services.showrooms.update(id, updates).await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn delete_showroom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _actor: SessionUser,
) -> ApiResult<serde_json::Value> {
    state.services.showrooms.delete(id).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "showroom_id": id,
        "status": "inactive"
    }))))
}

pub async fn assign_manager(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _actor: SessionUser,
    Json(body): Json<AssignManagerBody>,
) -> ApiResult<showroom::Model> {
    let saved = state
        .services
        .showrooms
        .assign_manager(id, body.manager_id)
        .await?;
    Ok(Json(ApiResponse::success(saved)))
}

pub async fn showroom_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<user::Model>> {
    let staff = state.services.showrooms.staff(id).await?;
    Ok(Json(ApiResponse::success(staff)))
}

pub async fn showroom_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShowroomStats> {
    let stats = state.services.showrooms.stats(id).await?;
    Ok(Json(ApiResponse::success(stats)))
}
