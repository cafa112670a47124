use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use crate::services::cache::client::{CacheClient, CacheResult};

// Every this many writes, expired entries are swept from the whole map.
const SWEEP_EVERY: u64 = 256;

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process cache client backed by a sharded concurrent map.
///
/// Entries carry a monotonic deadline. They are dropped when read past it, and
/// writes periodically sweep the map so entries nobody reads again are
/// reclaimed too.
#[derive(Clone, Debug, Default)]
pub struct InMemoryClient {
    entries: Arc<DashMap<String, Entry>>,
    writes: Arc<AtomicU64>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every entry past its deadline; returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed, "purged expired cache entries");
        }
        removed
    }
}

#[async_trait]
impl CacheClient for InMemoryClient {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();

        // The shard guard must be released before `remove_if` touches the same shard.
        let stale = match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => true,
        };

        if stale {
            // A concurrent `set_with_ttl` may have refreshed the key in between.
            self.entries
                .remove_if(key, |_, entry| entry.expires_at <= now);
        }

        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );

        let writes = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        if writes % SWEEP_EVERY == 0 {
            self.purge_expired();
        }
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> CacheResult<u64> {
        let removed = keys
            .iter()
            .filter(|key| self.entries.remove(key.as_str()).is_some())
            .count();
        Ok(removed as u64)
    }
}
