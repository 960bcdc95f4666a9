pub mod manager;
pub mod scope;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::context::ServiceKey;
use crate::repos::error::RepoError;
use crate::repos::store_repo::StoreRow;

pub use manager::StoreManager;
pub use scope::ScopeOption;

/// Root-context binding for the store reader.
pub static STORE_READER: ServiceKey<Arc<dyn StoreReader>> = ServiceKey::new("store_reader");

/// Root-context binding for the scope chosen at startup.
pub static SCOPE: ServiceKey<ScopeOption> = ServiceKey::new("scope");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("scope does not exist: {0}")]
    UnknownScope(ScopeOption),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub id: i64,
    pub code: String,
    pub website_id: i64,
    pub group_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.store_id,
            code: row.code,
            website_id: row.website_id,
            group_id: row.group_id,
            name: row.name,
            sort_order: row.sort_order,
            is_active: row.is_active,
        }
    }
}

#[async_trait]
pub trait StoreReader: Send + Sync {
    /// Stores under `scope`, ordered by (sort_order, id).
    async fn stores(&self, scope: &ScopeOption) -> Result<Vec<Store>, StoreError>;
}
