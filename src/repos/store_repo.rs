/*
 * Responsibility
 * - store_website / store_group / store の読み込み
 * - 起動時に一度だけ呼ばれる (StoreManager::load)
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct WebsiteRow {
    pub website_id: i64,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct GroupRow {
    pub group_id: i64,
    pub website_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StoreRow {
    pub store_id: i64,
    pub code: String,
    pub website_id: i64,
    pub group_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
}

pub async fn list_websites(db: &PgPool) -> RepoResult<Vec<WebsiteRow>> {
    let rows = sqlx::query_as::<_, WebsiteRow>(
        r#"
        SELECT website_id, code
        FROM store_website
        ORDER BY sort_order, website_id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_groups(db: &PgPool) -> RepoResult<Vec<GroupRow>> {
    let rows = sqlx::query_as::<_, GroupRow>(
        r#"
        SELECT group_id, website_id
        FROM store_group
        ORDER BY group_id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_stores(db: &PgPool) -> RepoResult<Vec<StoreRow>> {
    let rows = sqlx::query_as::<_, StoreRow>(
        r#"
        SELECT store_id, code, website_id, group_id, name, sort_order, is_active
        FROM store
        ORDER BY sort_order, store_id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}
