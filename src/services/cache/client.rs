//! Cache client interface used by higher-level services (auth contexts, etc.).
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command/serialization).
///
/// Note:
/// - Kept independent from `AppError` so callers decide how to fail
///   (the auth gate fails closed on any of these).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
    #[error("cache value error: {0}")]
    InvalidValue(String),
}

/// A minimal, string-based cache interface.
///
/// - Absence is `Ok(None)`, never an error.
/// - Writes replace any prior value under the same key.
///
/// Implementations must be cheap to clone (typically `Arc<...>` inside).
#[async_trait]
pub trait CacheClient: Clone + Send + Sync + 'static {
    // Returns the cache backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Get UTF-8 string value.
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    // Set value with TTL, overwriting any existing entry.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    // Delete keys. Returns number of deleted keys; missing keys are not an error.
    async fn del(&self, keys: &[String]) -> CacheResult<u64>;
}

/// Convenience helper to build a TTL from seconds.
pub fn ttl_seconds(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}
