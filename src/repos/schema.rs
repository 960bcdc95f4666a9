/*
 * Responsibility
 * - 起動時のテーブル作成 (CREATE TABLE IF NOT EXISTS)
 * - store hierarchy / core config data / admin users
 */
use sqlx::PgPool;

use crate::repos::error::RepoResult;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS store_website (
        website_id       BIGINT PRIMARY KEY,
        code             TEXT NOT NULL UNIQUE,
        name             TEXT NOT NULL,
        sort_order       INTEGER NOT NULL DEFAULT 0,
        default_group_id BIGINT NOT NULL DEFAULT 0,
        is_default       BOOLEAN NOT NULL DEFAULT FALSE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS store_group (
        group_id         BIGINT PRIMARY KEY,
        website_id       BIGINT NOT NULL REFERENCES store_website (website_id),
        name             TEXT NOT NULL,
        root_category_id BIGINT NOT NULL DEFAULT 0,
        default_store_id BIGINT NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS store (
        store_id   BIGINT PRIMARY KEY,
        code       TEXT NOT NULL UNIQUE,
        website_id BIGINT NOT NULL REFERENCES store_website (website_id),
        group_id   BIGINT NOT NULL REFERENCES store_group (group_id),
        name       TEXT NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0,
        is_active  BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS core_config_data (
        config_id BIGSERIAL PRIMARY KEY,
        scope     TEXT NOT NULL DEFAULT 'default',
        scope_id  BIGINT NOT NULL DEFAULT 0,
        path      TEXT NOT NULL,
        value     TEXT,
        UNIQUE (scope, scope_id, path)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS admin_user (
        user_id       BIGSERIAL PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_active     BOOLEAN NOT NULL DEFAULT TRUE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

pub async fn init(db: &PgPool) -> RepoResult<()> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(db).await?;
    }
    Ok(())
}
