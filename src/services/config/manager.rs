use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, warn};

use crate::repos::config_repo::{self, ConfigRow};
use crate::repos::error::RepoResult;
use crate::services::config::{ConfigGetter, ConfigScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ScopeKey {
    Default,
    Website(i64),
    Store(i64),
}

/// Immutable snapshot of core config data.
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<(ScopeKey, String), String>,
}

impl ConfigManager {
    pub async fn load(db: &PgPool) -> RepoResult<Self> {
        let rows = config_repo::list(db).await?;
        let manager = Self::from_rows(rows);
        info!(values = manager.values.len(), "core config data applied");
        Ok(manager)
    }

    pub fn from_rows(rows: impl IntoIterator<Item = ConfigRow>) -> Self {
        let mut values = HashMap::new();

        for row in rows {
            let key = match row.scope.as_str() {
                "default" => ScopeKey::Default,
                "websites" => ScopeKey::Website(row.scope_id),
                "stores" => ScopeKey::Store(row.scope_id),
                other => {
                    warn!(scope = other, path = %row.path, "ignoring config row with unknown scope");
                    continue;
                }
            };
            // NULL means "inherit from the parent scope".
            if let Some(value) = row.value {
                values.insert((key, row.path), value);
            }
        }

        Self { values }
    }

    fn lookup(&self, key: ScopeKey, path: &str) -> Option<String> {
        self.values.get(&(key, path.to_string())).cloned()
    }
}

impl ConfigGetter for ConfigManager {
    fn string(&self, path: &str, scope: ConfigScope) -> Option<String> {
        let chain = match scope {
            ConfigScope::Default => vec![ScopeKey::Default],
            ConfigScope::Store { id, website_id } => vec![
                ScopeKey::Store(id),
                ScopeKey::Website(website_id),
                ScopeKey::Default,
            ],
        };

        chain.into_iter().find_map(|key| self.lookup(key, path))
    }
}
