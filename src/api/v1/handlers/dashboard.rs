/*
 * Responsibility
 * - dashboard aggregate handlers
 * - /stats is the admin overview, /me is the caller's own numbers
 */
use axum::{extract::State, response::Response};

use crate::{
    api::v1::dto::dashboard::{AdminStatsResponse, UserDashboardResponse},
    api::v1::envelope::ApiEnvelope,
    api::v1::extractors::AuthCtxExtractor,
    error::AppError,
    repos::dashboard_repo,
    state::AppState,
};

pub async fn admin_stats(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Response, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin access required"));
    }

    let row = dashboard_repo::admin_stats(&state.db).await?;

    Ok(ApiEnvelope::success(
        "Dashboard stats retrieved successfully",
        AdminStatsResponse::from(row),
    )
    .ok())
}

pub async fn my_dashboard(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Response, AppError> {
    let row = dashboard_repo::user_dashboard(&state.db, ctx.user_id).await?;

    Ok(ApiEnvelope::success(
        "Dashboard retrieved successfully",
        UserDashboardResponse::from(row),
    )
    .ok())
}
