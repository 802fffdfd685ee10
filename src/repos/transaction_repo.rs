/*
 * Responsibility
 * - SQLx operations for event_collection_transactions
 * - aggregate queries for the per-event summary and per-user wallet views
 */
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, FromRow)]
pub struct TxRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub amount: Decimal,
    pub transaction_type: String,
    pub status: String,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewTransaction<'a> {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: &'a str,
    pub status: &'a str,
    pub description: Option<&'a str>,
    pub payment_method: Option<&'a str>,
    pub transaction_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct TxUpdate<'a> {
    pub amount: Option<Decimal>,
    pub transaction_type: Option<&'a str>,
    pub status: Option<&'a str>,
    // Some(None) clears the column, None keeps it.
    pub description: Option<Option<&'a str>>,
    pub payment_method: Option<Option<&'a str>>,
}

#[derive(Debug, Default)]
pub struct TxFilter<'a> {
    pub event_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<&'a str>,
    pub transaction_type: Option<&'a str>,
}

/// Per-event money totals. `None` when the event has no active transactions.
#[derive(Debug, FromRow)]
pub struct EventSummaryRow {
    pub transaction_count: i64,
    pub contributor_count: i64,
    pub total_amount: Decimal,
    pub completed_amount: Decimal,
    pub pending_amount: Decimal,
    pub failed_amount: Decimal,
    pub completed_count: i64,
    pub pending_count: i64,
    pub failed_count: i64,
}

const TX_COLUMNS: &str = r#"
    t.id, t.event_id, e.title AS event_title,
    t.user_id, u.full_name AS user_name,
    t.amount, t.transaction_type, t.status,
    t.description, t.payment_method, t.transaction_date,
    t.created_at, t.updated_at
"#;

const TX_FILTER: &str = r#"
    t.is_active = TRUE
    AND ($1::uuid IS NULL OR t.event_id = $1)
    AND ($2::uuid IS NULL OR t.user_id = $2)
    AND ($3::text IS NULL OR t.status = $3)
    AND ($4::text IS NULL OR t.transaction_type = $4)
"#;

pub async fn list(
    db: &PgPool,
    filter: &TxFilter<'_>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<TxRow>> {
    let rows = sqlx::query_as::<_, TxRow>(&format!(
        r#"
        SELECT {TX_COLUMNS}
        FROM event_collection_transactions t
        JOIN events e ON e.id = t.event_id
        JOIN users u ON u.id = t.user_id
        WHERE {TX_FILTER}
        ORDER BY t.created_at DESC
        LIMIT $5 OFFSET $6
        "#
    ))
    .bind(filter.event_id)
    .bind(filter.user_id)
    .bind(filter.status)
    .bind(filter.transaction_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn count(db: &PgPool, filter: &TxFilter<'_>) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as(&format!(
        r#"
        SELECT COUNT(*)
        FROM event_collection_transactions t
        WHERE {TX_FILTER}
        "#
    ))
    .bind(filter.event_id)
    .bind(filter.user_id)
    .bind(filter.status)
    .bind(filter.transaction_type)
    .fetch_one(db)
    .await?;

    Ok(n)
}

pub async fn get(db: &PgPool, transaction_id: Uuid) -> RepoResult<Option<TxRow>> {
    let row = sqlx::query_as::<_, TxRow>(&format!(
        r#"
        SELECT {TX_COLUMNS}
        FROM event_collection_transactions t
        JOIN events e ON e.id = t.event_id
        JOIN users u ON u.id = t.user_id
        WHERE t.id = $1 AND t.is_active = TRUE
        "#
    ))
    .bind(transaction_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(db: &PgPool, tx: &NewTransaction<'_>) -> RepoResult<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO event_collection_transactions (
            event_id, user_id, amount, transaction_type, status,
            description, payment_method, transaction_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()))
        RETURNING id
        "#,
    )
    .bind(tx.event_id)
    .bind(tx.user_id)
    .bind(tx.amount)
    .bind(tx.transaction_type)
    .bind(tx.status)
    .bind(tx.description)
    .bind(tx.payment_method)
    .bind(tx.transaction_date)
    .fetch_one(db)
    .await?;

    Ok(id)
}

pub async fn update(
    db: &PgPool,
    transaction_id: Uuid,
    changes: &TxUpdate<'_>,
) -> RepoResult<Option<Uuid>> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        UPDATE event_collection_transactions
        SET
            amount = COALESCE($2, amount),
            transaction_type = COALESCE($3, transaction_type),
            status = COALESCE($4, status),
            description = CASE WHEN $5 = FALSE THEN description ELSE $6 END,
            payment_method = CASE WHEN $7 = FALSE THEN payment_method ELSE $8 END,
            updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        RETURNING id
        "#,
    )
    .bind(transaction_id)
    .bind(changes.amount)
    .bind(changes.transaction_type)
    .bind(changes.status)
    .bind(changes.description.is_some())
    .bind(changes.description.flatten())
    .bind(changes.payment_method.is_some())
    .bind(changes.payment_method.flatten())
    .fetch_optional(db)
    .await?;

    Ok(row.map(|(id,)| id))
}

pub async fn soft_delete(db: &PgPool, transaction_id: Uuid) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE event_collection_transactions
        SET is_active = FALSE, updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        "#,
    )
    .bind(transaction_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Money totals for one event, in a single statement. Soft-deleted
/// transactions never count; no active rows at all means `None`.
pub async fn event_summary(db: &PgPool, event_id: Uuid) -> RepoResult<Option<EventSummaryRow>> {
    let row = sqlx::query_as::<_, EventSummaryRow>(
        r#"
        SELECT
            COUNT(*) AS transaction_count,
            COUNT(DISTINCT user_id) AS contributor_count,
            COALESCE(SUM(amount), 0) AS total_amount,
            COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0) AS completed_amount,
            COALESCE(SUM(amount) FILTER (WHERE status = 'pending'), 0) AS pending_amount,
            COALESCE(SUM(amount) FILTER (WHERE status = 'failed'), 0) AS failed_amount,
            COUNT(*) FILTER (WHERE status = 'completed') AS completed_count,
            COUNT(*) FILTER (WHERE status = 'pending') AS pending_count,
            COUNT(*) FILTER (WHERE status = 'failed') AS failed_count
        FROM event_collection_transactions
        WHERE event_id = $1 AND is_active = TRUE
        HAVING COUNT(*) > 0
        "#,
    )
    .bind(event_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// One user's history inside one event, newest first.
pub async fn user_history(
    db: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<TxRow>> {
    let rows = sqlx::query_as::<_, TxRow>(&format!(
        r#"
        SELECT {TX_COLUMNS}
        FROM event_collection_transactions t
        JOIN events e ON e.id = t.event_id
        JOIN users u ON u.id = t.user_id
        WHERE t.event_id = $1 AND t.user_id = $2 AND t.is_active = TRUE
        ORDER BY t.created_at DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(event_id)
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn user_history_count(db: &PgPool, event_id: Uuid, user_id: Uuid) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM event_collection_transactions
        WHERE event_id = $1 AND user_id = $2 AND is_active = TRUE
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(n)
}

/// The user's completed total within one event.
pub async fn user_event_total(db: &PgPool, event_id: Uuid, user_id: Uuid) -> RepoResult<Decimal> {
    let (total,): (Decimal,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(
            CASE WHEN transaction_type = 'contribution' THEN amount ELSE -amount END
        ), 0)
        FROM event_collection_transactions
        WHERE event_id = $1 AND user_id = $2 AND status = 'completed' AND is_active = TRUE
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(total)
}
