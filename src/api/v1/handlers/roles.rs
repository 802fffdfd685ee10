/*
 * Responsibility
 * - roles CRUD handlers (admin only)
 */
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use uuid::Uuid;

use crate::{
    api::v1::dto::roles::{RoleRequest, RoleResponse},
    api::v1::envelope::ApiEnvelope,
    api::v1::extractors::{AuthCtx, AuthCtxExtractor},
    error::AppError,
    repos::role_repo,
    state::AppState,
};

fn require_admin(ctx: &AuthCtx) -> Result<(), AppError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required"))
    }
}

pub async fn list_roles(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Response, AppError> {
    require_admin(&ctx)?;

    let rows = role_repo::list(&state.db).await?;
    let data: Vec<RoleResponse> = rows.into_iter().map(Into::into).collect();

    Ok(ApiEnvelope::success("Roles retrieved successfully", data).ok())
}

pub async fn create_role(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<RoleRequest>,
) -> Result<Response, AppError> {
    require_admin(&ctx)?;
    req.validate().map_err(AppError::validation)?;

    let row = role_repo::create(&state.db, req.name.trim()).await?;

    Ok(ApiEnvelope::success("Role created successfully", RoleResponse::from(row)).created())
}

pub async fn get_role(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(role_id): Path<Uuid>,
) -> Result<Response, AppError> {
    require_admin(&ctx)?;

    let row = role_repo::get(&state.db, role_id)
        .await?
        .ok_or_else(|| AppError::not_found("Role"))?;

    Ok(ApiEnvelope::success("Role retrieved successfully", RoleResponse::from(row)).ok())
}

pub async fn update_role(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(role_id): Path<Uuid>,
    Json(req): Json<RoleRequest>,
) -> Result<Response, AppError> {
    require_admin(&ctx)?;
    req.validate().map_err(AppError::validation)?;

    let row = role_repo::update(&state.db, role_id, req.name.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Role"))?;

    Ok(ApiEnvelope::success("Role updated successfully", RoleResponse::from(row)).ok())
}

pub async fn delete_role(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(role_id): Path<Uuid>,
) -> Result<Response, AppError> {
    require_admin(&ctx)?;

    let deleted = role_repo::soft_delete(&state.db, role_id).await?;
    if !deleted {
        return Err(AppError::not_found("Role"));
    }

    Ok(ApiEnvelope::message_only("Role deleted successfully").ok())
}
