/*
 * Responsibility
 * - SQLx operations for the events table
 * - list filters use the ($n IS NULL OR ...) pattern so one statement covers
 *   every filter combination
 */
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub due_pay_date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub persons_count: i32,
    pub status: String,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEvent<'a> {
    pub title: &'a str,
    pub category: &'a str,
    pub description: Option<&'a str>,
    pub event_date: NaiveDate,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub due_pay_date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub persons_count: i32,
    pub status: &'a str,
    pub created_by: Uuid,
}

#[derive(Debug, Default)]
pub struct EventUpdate<'a> {
    pub title: Option<&'a str>,
    pub category: Option<&'a str>,
    // Some(None) clears the column, None keeps it.
    pub description: Option<Option<&'a str>>,
    pub event_date: Option<NaiveDate>,
    pub start_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub due_pay_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub persons_count: Option<i32>,
    pub status: Option<&'a str>,
}

/// List filters. `created_by` restricts non-admin callers to their own events.
#[derive(Debug, Default)]
pub struct EventFilter<'a> {
    pub created_by: Option<Uuid>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub status: Option<&'a str>,
    pub category: Option<&'a str>,
    pub search: Option<&'a str>,
}

const EVENT_COLUMNS: &str = r#"
    e.id, e.title, e.category, e.description,
    e.event_date, e.start_date_time, e.end_date_time, e.due_pay_date,
    e.latitude, e.longitude, e.persons_count, e.status,
    e.created_by, u.full_name AS created_by_name,
    e.created_at, e.updated_at
"#;

const EVENT_FILTER: &str = r#"
    e.is_active = TRUE
    AND ($1::uuid IS NULL OR e.created_by = $1)
    AND ($2::date IS NULL OR e.event_date >= $2)
    AND ($3::date IS NULL OR e.event_date <= $3)
    AND ($4::text IS NULL OR e.status = $4)
    AND ($5::text IS NULL OR e.category = $5)
    AND ($6::text IS NULL
         OR e.title ILIKE '%' || $6 || '%'
         OR e.description ILIKE '%' || $6 || '%')
"#;

pub async fn list(
    db: &PgPool,
    filter: &EventFilter<'_>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<EventRow>> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM events e
        JOIN users u ON u.id = e.created_by
        WHERE {EVENT_FILTER}
        ORDER BY e.created_at DESC
        LIMIT $7 OFFSET $8
        "#
    ))
    .bind(filter.created_by)
    .bind(filter.from_date)
    .bind(filter.to_date)
    .bind(filter.status)
    .bind(filter.category)
    .bind(filter.search)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn count(db: &PgPool, filter: &EventFilter<'_>) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as(&format!(
        r#"
        SELECT COUNT(*)
        FROM events e
        WHERE {EVENT_FILTER}
        "#
    ))
    .bind(filter.created_by)
    .bind(filter.from_date)
    .bind(filter.to_date)
    .bind(filter.status)
    .bind(filter.category)
    .bind(filter.search)
    .fetch_one(db)
    .await?;

    Ok(n)
}

pub async fn get(db: &PgPool, event_id: Uuid) -> RepoResult<Option<EventRow>> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM events e
        JOIN users u ON u.id = e.created_by
        WHERE e.id = $1 AND e.is_active = TRUE
        "#
    ))
    .bind(event_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(db: &PgPool, event: &NewEvent<'_>) -> RepoResult<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO events (
            title, category, description,
            event_date, start_date_time, end_date_time, due_pay_date,
            latitude, longitude, persons_count, status, created_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
        "#,
    )
    .bind(event.title)
    .bind(event.category)
    .bind(event.description)
    .bind(event.event_date)
    .bind(event.start_date_time)
    .bind(event.end_date_time)
    .bind(event.due_pay_date)
    .bind(event.latitude)
    .bind(event.longitude)
    .bind(event.persons_count)
    .bind(event.status)
    .bind(event.created_by)
    .fetch_one(db)
    .await?;

    Ok(id)
}

pub async fn update(
    db: &PgPool,
    event_id: Uuid,
    changes: &EventUpdate<'_>,
) -> RepoResult<Option<Uuid>> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        UPDATE events
        SET
            title = COALESCE($2, title),
            category = COALESCE($3, category),
            description = CASE WHEN $4 = FALSE THEN description ELSE $5 END,
            event_date = COALESCE($6, event_date),
            start_date_time = COALESCE($7, start_date_time),
            end_date_time = COALESCE($8, end_date_time),
            due_pay_date = COALESCE($9, due_pay_date),
            latitude = COALESCE($10, latitude),
            longitude = COALESCE($11, longitude),
            persons_count = COALESCE($12, persons_count),
            status = COALESCE($13, status),
            updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        RETURNING id
        "#,
    )
    .bind(event_id)
    .bind(changes.title)
    .bind(changes.category)
    .bind(changes.description.is_some())
    .bind(changes.description.flatten())
    .bind(changes.event_date)
    .bind(changes.start_date_time)
    .bind(changes.end_date_time)
    .bind(changes.due_pay_date)
    .bind(changes.latitude)
    .bind(changes.longitude)
    .bind(changes.persons_count)
    .bind(changes.status)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|(id,)| id))
}

pub async fn set_status(db: &PgPool, event_id: Uuid, status: &str) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE events
        SET status = $2, updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        "#,
    )
    .bind(event_id)
    .bind(status)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn soft_delete(db: &PgPool, event_id: Uuid) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE events
        SET is_active = FALSE, updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        "#,
    )
    .bind(event_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists_active(db: &PgPool, event_id: Uuid) -> RepoResult<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (SELECT 1 FROM events WHERE id = $1 AND is_active = TRUE)
        "#,
    )
    .bind(event_id)
    .fetch_one(db)
    .await?;

    Ok(exists)
}
