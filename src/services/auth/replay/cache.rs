use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use crate::services::{
    auth::replay::store::{ReplayError, ReplayStore},
    cache::{CacheClient, MemoryCache, ValkeyClient},
};

/// Replay store on top of any `CacheClient`.
///
/// Fail-closed: any backend error is returned as `Err`, and the token
/// service turns that into an authentication failure.
#[derive(Clone)]
pub struct CacheReplayStore<C: CacheClient> {
    cache: Arc<C>,
    // Key prefix to avoid collisions with other users of the same Valkey.
    prefix: String,
}

impl CacheReplayStore<ValkeyClient> {
    pub async fn valkey(redis_url: &str) -> Result<Self, ReplayError> {
        let client = ValkeyClient::new(redis_url).await?;
        Ok(Self::new_with_cache(Arc::new(client), "jwt:jti"))
    }
}

impl CacheReplayStore<MemoryCache> {
    pub fn in_memory() -> Self {
        Self::new_with_cache(Arc::new(MemoryCache::new()), "jwt:jti")
    }
}

impl<C: CacheClient> CacheReplayStore<C> {
    pub fn new_with_cache(cache: Arc<C>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, raw: &str) -> String {
        format!("{}:{}", self.prefix, raw)
    }
}

impl<C: CacheClient> ReplayStore for CacheReplayStore<C> {
    fn check_and_store<'a>(
        &'a self,
        key: &'a str,
        ttl_secs: u64,
    ) -> Pin<Box<dyn Future<Output = Result<bool, ReplayError>> + Send + 'a>> {
        Box::pin(async move {
            let full_key = self.key(key);

            let first_time = self
                .cache
                .set_if_absent_with_ttl(&full_key, "1", Duration::from_secs(ttl_secs))
                .await?;

            Ok(first_time)
        })
    }

    fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed() {
        let store = CacheReplayStore::in_memory();
        assert_eq!(store.key("abc"), "jwt:jti:abc");
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn jti_is_accepted_once() {
        let store = CacheReplayStore::in_memory();
        assert!(store.check_and_store("abc", 60).await.unwrap());
        assert!(!store.check_and_store("abc", 60).await.unwrap());
    }
}
