/*
 * Responsibility
 * - user registration, profile CRUD and role assignment handlers
 * - authorization: list/assign-role are admin only, detail/update/delete
 *   are self-or-admin
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::v1::dto::{
        PageQuery,
        users::{
            AssignRoleRequest, RegisterUserRequest, UpdateUserRequest, UserListQuery, UserResponse,
        },
    },
    api::v1::envelope::ApiEnvelope,
    api::v1::extractors::AuthCtxExtractor,
    error::AppError,
    repos::{role_repo, user_repo},
    services::auth::password,
    state::AppState,
};

/// Public registration. No auth; the account starts unverified.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<Response, AppError> {
    req.validate().map_err(AppError::validation)?;

    let password_hash = password::hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        AppError::Internal
    })?;

    let user_id = user_repo::create(
        &state.db,
        req.full_name.trim(),
        req.email.trim(),
        req.contact_no.trim(),
        &password_hash,
    )
    .await?;

    Ok(ApiEnvelope::success("User registered successfully", json!({"user_id": user_id})).created())
}

pub async fn list_users(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(page): Query<PageQuery>,
    Query(query): Query<UserListQuery>,
) -> Result<Response, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin access required"));
    }

    let (page_no, page_size, offset) = page.resolve();
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let rows = user_repo::list(&state.db, search, page_size, offset).await?;
    let total = user_repo::count(&state.db, search).await?;

    let data: Vec<UserResponse> = rows.into_iter().map(Into::into).collect();

    Ok(ApiEnvelope::paginated(
        "Users retrieved successfully",
        data,
        page_no as u64,
        page_size as u64,
        total as u64,
    )
    .ok())
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !ctx.is_self_or_admin(user_id) {
        tracing::warn!(caller = %ctx.email, %user_id, "profile access denied");
        return Err(AppError::Forbidden("Access denied"));
    }

    let row = user_repo::get(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(ApiEnvelope::success("User retrieved successfully", UserResponse::from(row)).ok())
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Response, AppError> {
    if !ctx.is_self_or_admin(user_id) {
        return Err(AppError::Forbidden("Access denied"));
    }
    req.validate().map_err(AppError::validation)?;

    let profile_image_url: Option<Option<&str>> =
        req.profile_image_url.as_ref().map(|inner| inner.as_deref());

    let row = user_repo::update(
        &state.db,
        user_id,
        req.full_name.as_deref().map(str::trim),
        req.contact_no.as_deref().map(str::trim),
        profile_image_url,
    )
    .await?
    .ok_or_else(|| AppError::not_found("User"))?;

    Ok(ApiEnvelope::success("User updated successfully", UserResponse::from(row)).ok())
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !ctx.is_self_or_admin(user_id) {
        return Err(AppError::Forbidden("Access denied"));
    }

    let deleted = user_repo::soft_delete(&state.db, user_id).await?;
    if !deleted {
        return Err(AppError::not_found("User"));
    }

    Ok(ApiEnvelope::message_only("User deleted successfully").ok())
}

pub async fn assign_role(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Response, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin access required"));
    }

    user_repo::get(&state.db, req.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    role_repo::get(&state.db, req.role_id)
        .await?
        .ok_or_else(|| AppError::not_found("Role"))?;

    role_repo::assign_role(&state.db, req.user_id, req.role_id).await?;

    Ok(ApiEnvelope::message_only("Role assigned successfully").ok())
}
