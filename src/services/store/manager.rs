//! In-memory snapshot of the store hierarchy (websites → groups → stores).
//!
//! Loaded once at startup and never mutated afterwards, so it can be shared by
//! every request without locking.
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::repos::store_repo::{self, GroupRow, StoreRow, WebsiteRow};
use crate::services::store::{ScopeOption, Store, StoreError, StoreReader};

#[derive(Debug, Clone, Default)]
pub struct StoreManager {
    websites: Vec<WebsiteRow>,
    groups: Vec<GroupRow>,
    stores: Vec<Store>,
}

impl StoreManager {
    pub async fn load(db: &PgPool) -> Result<Self, StoreError> {
        let websites = store_repo::list_websites(db).await?;
        let groups = store_repo::list_groups(db).await?;
        let stores = store_repo::list_stores(db).await?;

        info!(
            websites = websites.len(),
            groups = groups.len(),
            stores = stores.len(),
            "store hierarchy loaded"
        );

        Ok(Self::from_rows(websites, groups, stores))
    }

    pub fn from_rows(
        websites: Vec<WebsiteRow>,
        groups: Vec<GroupRow>,
        stores: Vec<StoreRow>,
    ) -> Self {
        let mut stores: Vec<Store> = stores.into_iter().map(Store::from).collect();
        stores.sort_by_key(|s| (s.sort_order, s.id));

        Self {
            websites,
            groups,
            stores,
        }
    }

    /// Fails if `scope` names a website, group or store that does not exist.
    pub fn resolve(&self, scope: &ScopeOption) -> Result<(), StoreError> {
        let found = match scope {
            ScopeOption::Default => true,
            ScopeOption::Website(code) => self.websites.iter().any(|w| &w.code == code),
            ScopeOption::Group(id) => self.groups.iter().any(|g| g.group_id == *id),
            ScopeOption::Store(code) => self.stores.iter().any(|s| &s.code == code),
        };

        if found {
            Ok(())
        } else {
            Err(StoreError::UnknownScope(scope.clone()))
        }
    }

    fn website_id(&self, code: &str) -> Option<i64> {
        self.websites
            .iter()
            .find(|w| w.code == code)
            .map(|w| w.website_id)
    }

    fn select(&self, scope: &ScopeOption) -> Result<Vec<Store>, StoreError> {
        self.resolve(scope)?;

        let selected = match scope {
            ScopeOption::Default => self.stores.clone(),
            ScopeOption::Website(code) => {
                let website_id = self.website_id(code);
                self.stores
                    .iter()
                    .filter(|s| Some(s.website_id) == website_id)
                    .cloned()
                    .collect()
            }
            ScopeOption::Group(id) => self
                .stores
                .iter()
                .filter(|s| s.group_id == *id)
                .cloned()
                .collect(),
            ScopeOption::Store(code) => self
                .stores
                .iter()
                .filter(|s| &s.code == code)
                .cloned()
                .collect(),
        };

        Ok(selected)
    }
}

#[async_trait]
impl StoreReader for StoreManager {
    async fn stores(&self, scope: &ScopeOption) -> Result<Vec<Store>, StoreError> {
        self.select(scope)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Two websites: `base` (stores `default`, `de`) and `b2b` (store `b2b_en`).
    pub fn sample() -> StoreManager {
        let websites = vec![
            WebsiteRow {
                website_id: 1,
                code: "base".into(),
            },
            WebsiteRow {
                website_id: 2,
                code: "b2b".into(),
            },
        ];
        let groups = vec![
            GroupRow {
                group_id: 1,
                website_id: 1,
            },
            GroupRow {
                group_id: 2,
                website_id: 2,
            },
        ];
        let store = |store_id: i64, code: &str, website_id, group_id, sort_order| StoreRow {
            store_id,
            code: code.into(),
            website_id,
            group_id,
            name: code.to_uppercase(),
            sort_order,
            is_active: true,
        };
        let stores = vec![
            store(3, "b2b_en", 2, 2, 0),
            store(2, "de", 1, 1, 10),
            store(1, "default", 1, 1, 0),
        ];

        StoreManager::from_rows(websites, groups, stores)
    }
}
