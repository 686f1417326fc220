use crate::{
    auth::SessionUser,
    services::imports::{ImportReport, ImportRow, RowValidation},
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, response::Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ImportSubmission {
    pub rows: Vec<ImportRow>,
    /// Validate only; nothing is written.
    #[serde(default)]
    pub dry_run: bool,
}

/// Row-map ingestion for product/pricing uploads. Rows are processed
/// independently; the report carries per-row outcomes.
pub async fn import_products(
    State(state): State<AppState>,
    actor: SessionUser,
    Json(submission): Json<ImportSubmission>,
) -> ApiResult<ImportReport> {
    if submission.dry_run {
        let validations: Vec<RowValidation> =
            state.services.imports.validate_rows(&submission.rows);
        let skipped_invalid = validations.iter().filter(|v| !v.is_valid).count();
        return Ok(Json(ApiResponse::success(ImportReport {
            attempted: submission.rows.len(),
            success_count: 0,
            error_count: 0,
            skipped_invalid,
            row_errors: Vec::new(),
            validations,
        })));
    }

    let report = state
        .services
        .imports
        .commit_rows(submission.rows, &actor)
        .await?;
    Ok(Json(ApiResponse::success(report)))
}
