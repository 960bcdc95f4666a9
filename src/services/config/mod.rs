//! Read access to core config data (`core_config_data`).
//!
//! Values are stored per scope (`default`, `websites`, `stores`); a lookup
//! for a store falls back to its website and then to the default scope.
pub mod manager;

use std::sync::Arc;

use crate::context::ServiceKey;

pub use manager::ConfigManager;

/// Root-context binding for the config getter.
pub static CONFIG_GETTER: ServiceKey<Arc<dyn ConfigGetter>> = ServiceKey::new("config_getter");

/// Where a config value is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Default,
    Store { id: i64, website_id: i64 },
}

pub trait ConfigGetter: Send + Sync {
    fn string(&self, path: &str, scope: ConfigScope) -> Option<String>;
}
