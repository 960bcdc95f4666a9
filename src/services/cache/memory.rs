use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::services::cache::client::{CacheClient, CacheResult};

// Expired entries are swept once the map grows past this many keys.
const SWEEP_THRESHOLD: usize = 10_000;

/// In-process cache for single-instance deployments.
///
/// `DashMap::entry` holds the shard lock for the whole check-and-insert, which
/// is what makes `set_if_absent_with_ttl` atomic per key.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    // key -> expiry
    entries: Arc<DashMap<String, Instant>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn sweep(&self, now: Instant) {
        self.entries.retain(|_, expires_at| *expires_at > now);
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        _value: &str,
        ttl: Duration,
    ) -> CacheResult<bool> {
        let now = Instant::now();

        if self.entries.len() > SWEEP_THRESHOLD {
            self.sweep(now);
        }

        let expires_at = now + ttl.max(Duration::from_secs(1));

        let inserted = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if *occupied.get() > now {
                    false
                } else {
                    occupied.insert(expires_at);
                    true
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(expires_at);
                true
            }
        };

        Ok(inserted)
    }
}
