/// Factory: build `AuthSessionService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    AuthContextCache, AuthSessionConfig, AuthSessionService,
    context_cache::CacheBackedContextStore,
};
use crate::services::cache::CacheError;

pub async fn build_auth_service(config: &Config) -> Result<Arc<AuthSessionService>, CacheError> {
    let cache: Arc<dyn AuthContextCache> = match config.valkey_url.as_deref() {
        Some(url) => {
            let store = CacheBackedContextStore::connect(url, &config.auth_cache_prefix).await?;
            tracing::info!(backend = store.backend_name(), "auth context cache ready");
            Arc::new(store)
        }
        None => {
            let store = CacheBackedContextStore::in_memory(&config.auth_cache_prefix);
            tracing::warn!(
                backend = store.backend_name(),
                "VALKEY_URL not set; auth contexts are kept in process memory"
            );
            Arc::new(store)
        }
    };

    let session_config = AuthSessionConfig {
        evict_on_expired: config.auth_evict_expired,
        ..AuthSessionConfig::new(config.auth_token_ttl_seconds)
    };

    Ok(Arc::new(AuthSessionService::new(cache, session_config)))
}
