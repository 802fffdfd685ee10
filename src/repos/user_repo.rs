/*
 * Responsibility
 * - SQLx operations for the users table
 * - takes a PgPool, returns row structs; soft delete only (is_active flag)
 * - DB errors come back as RepoError for upper layers to map
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub contact_no: String,
    pub profile_image_url: Option<String>,
    pub status: i32,
    pub email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential view used by the login/OTP flows only.
#[derive(Debug, FromRow)]
pub struct UserAuthRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub email_verified: bool,
}

const USER_COLUMNS: &str = r#"
    id, full_name, email, contact_no, profile_image_url,
    status, email_verified, last_login, created_at, updated_at
"#;

/// Active, enabled (status=1) account by email. Login path.
pub async fn find_auth_by_email(db: &PgPool, email: &str) -> RepoResult<Option<UserAuthRow>> {
    let row = sqlx::query_as::<_, UserAuthRow>(
        r#"
        SELECT id, full_name, email, password_hash, email_verified
        FROM users
        WHERE email = $1 AND is_active = TRUE AND status = 1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Active, enabled account by id. OTP verification path.
pub async fn find_auth_by_id(db: &PgPool, user_id: Uuid) -> RepoResult<Option<UserAuthRow>> {
    let row = sqlx::query_as::<_, UserAuthRow>(
        r#"
        SELECT id, full_name, email, password_hash, email_verified
        FROM users
        WHERE id = $1 AND is_active = TRUE AND status = 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(
    db: &PgPool,
    full_name: &str,
    email: &str,
    contact_no: &str,
    password_hash: &str,
) -> RepoResult<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (full_name, email, contact_no, password_hash, status, email_verified)
        VALUES ($1, $2, $3, $4, 1, FALSE)
        RETURNING id
        "#,
    )
    .bind(full_name)
    .bind(email)
    .bind(contact_no)
    .bind(password_hash)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(id)
}

pub async fn list(
    db: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE is_active = TRUE
          AND ($1::text IS NULL OR full_name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%')
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(search)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn count(db: &PgPool, search: Option<&str>) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM users
        WHERE is_active = TRUE
          AND ($1::text IS NULL OR full_name ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%')
        "#,
    )
    .bind(search)
    .fetch_one(db)
    .await?;

    Ok(n)
}

pub async fn get(db: &PgPool, user_id: Uuid) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE id = $1 AND is_active = TRUE
        "#
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    full_name: Option<&str>,
    contact_no: Option<&str>,
    profile_image_url: Option<Option<&str>>,
) -> RepoResult<Option<UserRow>> {
    // profile_image_url: Some(Some(v)) -> set to v
    // profile_image_url: Some(None)    -> set to NULL
    // profile_image_url: None          -> do not update
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET
            full_name = COALESCE($2, full_name),
            contact_no = COALESCE($3, contact_no),
            profile_image_url = CASE
                WHEN $4 = FALSE THEN profile_image_url
                ELSE $5
            END,
            updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(full_name)
    .bind(contact_no)
    .bind(profile_image_url.is_some())
    .bind(profile_image_url.flatten())
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn soft_delete(db: &PgPool, user_id: Uuid) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_active = FALSE, updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn mark_email_verified(db: &PgPool, user_id: Uuid) -> RepoResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET email_verified = TRUE, updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

pub async fn touch_last_login(db: &PgPool, user_id: Uuid, now: DateTime<Utc>) -> RepoResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET last_login = $2
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(now)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}
