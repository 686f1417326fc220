use crate::{db, ApiResponse, ApiResult, AppState};
use axum::{extract::State, response::Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// Liveness plus a database ping.
pub async fn health(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    let database = match db::check_connection(&state.db).await {
        Ok(()) => "ok",
        Err(_) => "unreachable",
    };

    Ok(Json(ApiResponse::success(HealthStatus {
        status: "ok",
        database,
    })))
}
