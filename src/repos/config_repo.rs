/*
 * Responsibility
 * - core_config_data の全件読み込み
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ConfigRow {
    pub scope: String,
    pub scope_id: i64,
    pub path: String,
    pub value: Option<String>,
}

pub async fn list(db: &PgPool) -> RepoResult<Vec<ConfigRow>> {
    let rows = sqlx::query_as::<_, ConfigRow>(
        r#"
        SELECT scope, scope_id, path, value
        FROM core_config_data
        ORDER BY config_id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}
