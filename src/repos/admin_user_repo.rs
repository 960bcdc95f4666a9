/*
 * Responsibility
 * - admin_user テーブル向け SQLx 操作
 * - login 用の lookup と、起動時の bootstrap user upsert
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, FromRow)]
pub struct AdminUserRow {
    pub user_id: i64,
    pub username: String,
    pub password_hash: String,
}

pub async fn find_active_by_username(
    db: &PgPool,
    username: &str,
) -> RepoResult<Option<AdminUserRow>> {
    let row = sqlx::query_as::<_, AdminUserRow>(
        r#"
        SELECT user_id, username, password_hash
        FROM admin_user
        WHERE username = $1 AND is_active
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Creates the user, or resets its password and re-activates it.
pub async fn upsert(db: &PgPool, username: &str, password_hash: &str) -> RepoResult<i64> {
    let user_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO admin_user (username, password_hash, is_active)
        VALUES ($1, $2, TRUE)
        ON CONFLICT (username) DO UPDATE
        SET password_hash = EXCLUDED.password_hash,
            is_active = TRUE
        RETURNING user_id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(db)
    .await?;

    Ok(user_id)
}
