/*
 * Responsibility
 * - SQLx operations for roles and user_roles
 * - one active role per user: assigning deactivates the previous rows
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, FromRow)]
pub struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn list(db: &PgPool) -> RepoResult<Vec<RoleRow>> {
    let rows = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM roles
        WHERE is_active = TRUE
        ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(db: &PgPool, name: &str) -> RepoResult<RoleRow> {
    let row = sqlx::query_as::<_, RoleRow>(
        r#"
        INSERT INTO roles (name)
        VALUES ($1)
        RETURNING id, name, created_at, updated_at
        "#,
    )
    .bind(name)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn get(db: &PgPool, role_id: Uuid) -> RepoResult<Option<RoleRow>> {
    let row = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM roles
        WHERE id = $1 AND is_active = TRUE
        "#,
    )
    .bind(role_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn update(db: &PgPool, role_id: Uuid, name: &str) -> RepoResult<Option<RoleRow>> {
    let row = sqlx::query_as::<_, RoleRow>(
        r#"
        UPDATE roles
        SET name = $2, updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        RETURNING id, name, created_at, updated_at
        "#,
    )
    .bind(role_id)
    .bind(name)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn soft_delete(db: &PgPool, role_id: Uuid) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE roles
        SET is_active = FALSE, updated_at = NOW()
        WHERE id = $1 AND is_active = TRUE
        "#,
    )
    .bind(role_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// The user's single active role name, if any.
pub async fn active_role_name_for_user(db: &PgPool, user_id: Uuid) -> RepoResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT r.name
        FROM user_roles ur
        JOIN roles r ON r.id = ur.role_id AND r.is_active = TRUE
        WHERE ur.user_id = $1 AND ur.is_active = TRUE
        ORDER BY ur.created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|(name,)| name))
}

/// Deactivate any existing assignment rows, then activate the new one.
///
/// user_roles is UNIQUE(user_id, role_id), so re-assigning a role the user
/// held before upserts the old row back to active.
pub async fn assign_role(db: &PgPool, user_id: Uuid, role_id: Uuid) -> RepoResult<()> {
    let mut tx = db.begin().await.map_err(RepoError::Db)?;

    sqlx::query(
        r#"
        UPDATE user_roles
        SET is_active = FALSE, updated_at = NOW()
        WHERE user_id = $1 AND is_active = TRUE
        "#,
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, role_id)
        DO UPDATE SET is_active = TRUE, updated_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(role_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await.map_err(RepoError::Db)?;

    Ok(())
}
