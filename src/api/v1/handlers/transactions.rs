/*
 * Responsibility
 * - collection transaction handlers (CRUD + aggregates)
 * - anyone authenticated can record and read; mutations of existing rows
 *   are admin only
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use uuid::Uuid;

use crate::{
    api::v1::dto::{
        PageQuery,
        transactions::{
            CreateTransactionRequest, EventSummaryResponse, TransactionListQuery,
            TransactionResponse, TransactionStatus, TransactionType, UpdateTransactionRequest,
            UserEventHistoryResponse,
        },
    },
    api::v1::envelope::ApiEnvelope,
    api::v1::extractors::AuthCtxExtractor,
    error::AppError,
    repos::{
        event_repo,
        transaction_repo::{self, NewTransaction, TxFilter, TxUpdate},
    },
    state::AppState,
};

pub async fn list_transactions(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    Query(page): Query<PageQuery>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Response, AppError> {
    let (page_no, page_size, offset) = page.resolve();

    let filter = TxFilter {
        event_id: query.event_id,
        user_id: query.user_id,
        status: query.status.map(TransactionStatus::as_str),
        transaction_type: query.transaction_type.map(TransactionType::as_str),
    };

    let rows = transaction_repo::list(&state.db, &filter, page_size, offset).await?;
    let total = transaction_repo::count(&state.db, &filter).await?;

    let data: Vec<TransactionResponse> = rows.into_iter().map(Into::into).collect();

    Ok(ApiEnvelope::paginated(
        "Transactions retrieved successfully",
        data,
        page_no as u64,
        page_size as u64,
        total as u64,
    )
    .ok())
}

pub async fn create_transaction(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<Response, AppError> {
    req.validate().map_err(AppError::validation)?;

    if !event_repo::exists_active(&state.db, req.event_id).await? {
        return Err(AppError::not_found("Event"));
    }

    let tx = NewTransaction {
        event_id: req.event_id,
        user_id: req.user_id,
        amount: req.amount,
        transaction_type: req.transaction_type.as_str(),
        status: req.status.unwrap_or(TransactionStatus::Pending).as_str(),
        description: req.description.as_deref(),
        payment_method: req.payment_method.as_deref(),
        transaction_date: req.transaction_date,
    };

    let transaction_id = transaction_repo::create(&state.db, &tx).await?;
    let row = transaction_repo::get(&state.db, transaction_id)
        .await?
        .ok_or(AppError::Internal)?;

    Ok(
        ApiEnvelope::success("Transaction created successfully", TransactionResponse::from(row))
            .created(),
    )
}

pub async fn get_transaction(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    Path(transaction_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let row = transaction_repo::get(&state.db, transaction_id)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction"))?;

    Ok(
        ApiEnvelope::success("Transaction retrieved successfully", TransactionResponse::from(row))
            .ok(),
    )
}

pub async fn update_transaction(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(transaction_id): Path<Uuid>,
    Json(req): Json<UpdateTransactionRequest>,
) -> Result<Response, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin access required"));
    }
    req.validate().map_err(AppError::validation)?;

    let changes = TxUpdate {
        amount: req.amount,
        transaction_type: req.transaction_type.map(TransactionType::as_str),
        status: req.status.map(TransactionStatus::as_str),
        description: req.description.as_ref().map(|d| d.as_deref()),
        payment_method: req.payment_method.as_ref().map(|p| p.as_deref()),
    };

    transaction_repo::update(&state.db, transaction_id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction"))?;

    let row = transaction_repo::get(&state.db, transaction_id)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction"))?;

    Ok(
        ApiEnvelope::success("Transaction updated successfully", TransactionResponse::from(row))
            .ok(),
    )
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(transaction_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin access required"));
    }

    let deleted = transaction_repo::soft_delete(&state.db, transaction_id).await?;
    if !deleted {
        return Err(AppError::not_found("Transaction"));
    }

    Ok(ApiEnvelope::message_only("Transaction deleted successfully").ok())
}

/// GET /events/{event_id}/transactions/summary
pub async fn event_summary(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let row = transaction_repo::event_summary(&state.db, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Transactions for this event"))?;

    Ok(ApiEnvelope::success(
        "Event summary retrieved successfully",
        EventSummaryResponse::from_row(event_id, row),
    )
    .ok())
}

/// GET /events/{event_id}/users/{user_id}/transactions
pub async fn user_event_history(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
    Query(page): Query<PageQuery>,
) -> Result<Response, AppError> {
    let (page_no, page_size, offset) = page.resolve();

    let total = transaction_repo::user_history_count(&state.db, event_id, user_id).await?;
    if total == 0 {
        return Err(AppError::not_found("Transactions for this user"));
    }

    let rows = transaction_repo::user_history(&state.db, event_id, user_id, page_size, offset).await?;
    let total_amount = transaction_repo::user_event_total(&state.db, event_id, user_id).await?;

    let body = UserEventHistoryResponse {
        event_id,
        user_id,
        total_amount,
        transactions: rows.into_iter().map(Into::into).collect(),
    };

    Ok(ApiEnvelope::paginated(
        "Transactions retrieved successfully",
        body,
        page_no as u64,
        page_size as u64,
        total as u64,
    )
    .ok())
}
