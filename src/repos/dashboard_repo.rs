/*
 * Responsibility
 * - aggregate queries behind the dashboard endpoints
 * - every count and sum excludes soft-deleted rows
 */
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, FromRow)]
pub struct AdminStatsRow {
    pub total_users: i64,
    pub active_events: i64,
    pub total_payment: Decimal,
    pub pending_payment: Decimal,
}

#[derive(Debug, FromRow)]
pub struct UserDashboardRow {
    pub events_created: i64,
    pub events_joined: i64,
    pub wallet_balance: Decimal,
}

pub async fn admin_stats(db: &PgPool) -> RepoResult<AdminStatsRow> {
    let row = sqlx::query_as::<_, AdminStatsRow>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users WHERE is_active = TRUE) AS total_users,
            (SELECT COUNT(*) FROM events
             WHERE is_active = TRUE AND status IN ('draft', 'active')) AS active_events,
            (SELECT COALESCE(SUM(amount), 0) FROM event_collection_transactions
             WHERE is_active = TRUE AND status = 'completed') AS total_payment,
            (SELECT COALESCE(SUM(amount), 0) FROM event_collection_transactions
             WHERE is_active = TRUE AND status = 'pending') AS pending_payment
        "#,
    )
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn user_dashboard(db: &PgPool, user_id: Uuid) -> RepoResult<UserDashboardRow> {
    let row = sqlx::query_as::<_, UserDashboardRow>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM events
             WHERE created_by = $1 AND is_active = TRUE) AS events_created,
            (SELECT COUNT(DISTINCT t.event_id)
             FROM event_collection_transactions t
             JOIN events e ON e.id = t.event_id AND e.is_active = TRUE
             WHERE t.user_id = $1 AND t.is_active = TRUE) AS events_joined,
            (SELECT COALESCE(SUM(
                 CASE WHEN transaction_type = 'contribution' THEN amount ELSE -amount END
             ), 0)
             FROM event_collection_transactions
             WHERE user_id = $1 AND status = 'completed' AND is_active = TRUE) AS wallet_balance
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}
