use std::{future::Future, pin::Pin};

use crate::services::cache::CacheError;

/// Set of consumed token identifiers (JTIs).
pub trait ReplayStore: Send + Sync {
    // Atomically check whether `key` was already seen and record it with TTL.
    //
    // Returns:
    // - Ok(true)  => first time (recorded)
    // - Ok(false) => replay detected (already recorded)
    // - Err(_)    => backend failure (caller must treat as authentication failure)
    fn check_and_store<'a>(
        &'a self,
        key: &'a str,
        ttl_secs: u64,
    ) -> Pin<Box<dyn Future<Output = Result<bool, ReplayError>> + Send + 'a>>;

    // Backend name for startup logs.
    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}
