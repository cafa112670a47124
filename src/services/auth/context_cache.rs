use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

use crate::services::{
    auth::context::AuthenticationContext,
    cache::{CacheClient, CacheError, InMemoryClient, ValkeyClient},
};

/// Storage contract for authentication contexts.
///
/// - `get` of an unknown (or already evicted) key is `Ok(None)`
/// - `put` replaces; a failed write is an `Err`, never silently dropped
/// - `remove` of absent keys is a no-op
///
/// The backend TTL is advisory: an entry may outlive its `expiry_at`.
#[async_trait]
pub trait AuthContextCache: Send + Sync {
    async fn put(
        &self,
        key: &str,
        value: &AuthenticationContext,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<AuthenticationContext>, CacheError>;

    async fn remove(&self, keys: &[String]) -> Result<(), CacheError>;
}

/// `AuthContextCache` over any string cache: contexts are stored as JSON
/// under `<prefix>:<key>`.
#[derive(Clone)]
pub struct CacheBackedContextStore<C: CacheClient> {
    cache: Arc<C>,
    // Optional key prefix to avoid collisions across environments
    prefix: String,
}

impl CacheBackedContextStore<ValkeyClient> {
    pub async fn connect(redis_url: &str, prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = ValkeyClient::new(redis_url).await?;
        Ok(Self::new_with_cache(Arc::new(client), prefix))
    }
}

impl CacheBackedContextStore<InMemoryClient> {
    pub fn in_memory(prefix: impl Into<String>) -> Self {
        Self::new_with_cache(Arc::new(InMemoryClient::new()), prefix)
    }
}

impl<C: CacheClient> CacheBackedContextStore<C> {
    pub fn new_with_cache(cache: Arc<C>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }

    pub fn key(&self, raw: &str) -> String {
        format!("{}:{}", self.prefix, raw)
    }
}

#[async_trait]
impl<C: CacheClient> AuthContextCache for CacheBackedContextStore<C> {
    async fn put(
        &self,
        key: &str,
        value: &AuthenticationContext,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let json =
            serde_json::to_string(value).map_err(|e| CacheError::InvalidValue(e.to_string()))?;
        self.cache.set_with_ttl(&self.key(key), &json, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<AuthenticationContext>, CacheError> {
        let Some(json) = self.cache.get_string(&self.key(key)).await? else {
            return Ok(None);
        };

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| CacheError::InvalidValue(e.to_string()))
    }

    async fn remove(&self, keys: &[String]) -> Result<(), CacheError> {
        let full_keys: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        self.cache.del(&full_keys).await?;
        Ok(())
    }
}
