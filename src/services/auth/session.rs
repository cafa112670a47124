use std::sync::Arc;
use tracing::{debug, warn};

use crate::repos::user_repo::User;
use crate::services::auth::{
    clock::{Clock, SystemClock},
    context::AuthenticationContext,
    context_cache::AuthContextCache,
    error::AuthError,
    token,
    user_context::UserContextStore,
};
use crate::services::cache::ttl_seconds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSessionConfig {
    /// Cache entry lifetime and semantic validity window, in seconds.
    pub ttl_seconds: u64,
    /// Remove a context from the cache as soon as validation finds it expired.
    pub evict_on_expired: bool,
}

impl AuthSessionConfig {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl_seconds,
            evict_on_expired: false,
        }
    }
}

/// Owns the authentication context lifecycle: create, validate, destroy.
///
/// Tokens handed out are `base64(token_id)`; contexts are cached under the
/// raw `token_id` string. A context is valid only while it is both present in
/// the cache and `expiry_at` is in the future; the cache TTL alone is not
/// trusted.
#[derive(Clone)]
pub struct AuthSessionService {
    cache: Arc<dyn AuthContextCache>,
    clock: Arc<dyn Clock>,
    config: AuthSessionConfig,
}

impl AuthSessionService {
    pub fn new(cache: Arc<dyn AuthContextCache>, config: AuthSessionConfig) -> Self {
        Self::with_clock(cache, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        cache: Arc<dyn AuthContextCache>,
        config: AuthSessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            clock,
            config,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.config.ttl_seconds
    }

    /// Create a context for `user` and return its external token.
    ///
    /// Exactly one cache write. Fails only if that write fails.
    pub async fn create_authentication_context(&self, user: User) -> Result<String, AuthError> {
        let token_id = token::generate();
        let now = self.clock.now_millis();
        let context = AuthenticationContext::new(token_id, user, now, self.config.ttl_seconds);

        self.cache
            .put(
                &token_id.to_string(),
                &context,
                ttl_seconds(self.config.ttl_seconds),
            )
            .await
            .inspect_err(|err| warn!(error = %err, "failed to store auth context"))?;

        debug!(
            user_id = %context.user.id,
            created_at = context.created_at,
            expiry_at = context.expiry_at,
            "auth context created"
        );

        Ok(token::encode(&token_id))
    }

    /// Remove the context behind `external_token`.
    ///
    /// Returns `false` when there was nothing to remove, including malformed
    /// tokens and backend failures. Never errors.
    pub async fn destroy_authentication_context(&self, external_token: &str) -> bool {
        let Ok(token_id) = token::decode(external_token) else {
            debug!("destroy requested for malformed token");
            return false;
        };
        let key = token_id.to_string();

        match self.cache.get(&key).await {
            Ok(Some(_)) => {}
            Ok(None) => return false,
            Err(err) => {
                warn!(error = %err, "auth context lookup failed during destroy");
                return false;
            }
        }

        if let Err(err) = self.cache.remove(&[key]).await {
            warn!(error = %err, "failed to remove auth context");
            return false;
        }

        true
    }

    /// Resolve `external_token` and, on success, write its user into `store`.
    ///
    /// `store` is written exactly once on success and never on failure.
    pub async fn set_user_context<S>(
        &self,
        external_token: &str,
        store: &mut S,
    ) -> Result<(), AuthError>
    where
        S: UserContextStore + ?Sized,
    {
        let context = self.resolve(external_token).await?;
        store.set_user(context.user);
        Ok(())
    }

    async fn resolve(&self, external_token: &str) -> Result<AuthenticationContext, AuthError> {
        let token_id = token::decode(external_token)?;
        let key = token_id.to_string();

        let context = self.cache.get(&key).await?.ok_or(AuthError::NotFound)?;

        if context.is_expired_at(self.clock.now_millis()) {
            if self.config.evict_on_expired {
                if let Err(err) = self.cache.remove(&[key]).await {
                    warn!(error = %err, "failed to evict expired auth context");
                }
            }
            return Err(AuthError::Expired);
        }

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::testing::{
        CacheCall, ManualClock, RecordingCache, RecordingUserStore,
    };
    use crate::services::auth::user_context::UserContext;
    use std::time::Duration;
    use uuid::Uuid;

    const START: i64 = 1_700_000_000_000;

    fn user() -> User {
        User::new("test@example.com", None)
    }

    fn service(cache: &Arc<RecordingCache>, clock: &Arc<ManualClock>) -> AuthSessionService {
        AuthSessionService::with_clock(cache.clone(), AuthSessionConfig::new(60), clock.clone())
    }

    async fn seed(cache: &RecordingCache, context: &AuthenticationContext) {
        cache
            .put(
                &context.token_id.to_string(),
                context,
                Duration::from_secs(600),
            )
            .await
            .unwrap();
        cache.clear_calls();
    }

    #[tokio::test]
    async fn create_returns_token_and_writes_once() {
        let cache = RecordingCache::new();
        let clock = ManualClock::new(START);
        let input = user();

        let token = service(&cache, &clock)
            .create_authentication_context(input.clone())
            .await
            .unwrap();

        assert!(!token.is_empty());
        let puts = cache.puts();
        assert_eq!(puts.len(), 1);
        let CacheCall::Put { key, value, ttl } = &puts[0] else {
            unreachable!()
        };
        assert_eq!(value.user, input);
        assert_eq!(value.created_at, START);
        assert_eq!(value.expiry_at, START + 60_000);
        assert_eq!(*ttl, Duration::from_secs(60));
        // stored under the raw id; the token is its base64 form
        assert_eq!(key, &value.token_id.to_string());
        assert_eq!(token::decode(&token).unwrap(), value.token_id);
    }

    #[tokio::test]
    async fn create_issues_distinct_tokens() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));

        let a = svc.create_authentication_context(user()).await.unwrap();
        let b = svc.create_authentication_context(user()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn create_surfaces_backend_failure() {
        let cache = RecordingCache::new();
        cache.fail();

        let result = service(&cache, &ManualClock::new(START))
            .create_authentication_context(user())
            .await;
        assert!(matches!(result, Err(AuthError::Backend(_))));
    }

    #[tokio::test]
    async fn destroy_is_idempotent() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));
        let token = svc.create_authentication_context(user()).await.unwrap();
        cache.clear_calls();

        assert!(svc.destroy_authentication_context(&token).await);
        assert_eq!(cache.removes().len(), 1);

        assert!(!svc.destroy_authentication_context(&token).await);
        assert_eq!(cache.removes().len(), 1);
    }

    #[tokio::test]
    async fn destroy_absent_does_not_mutate() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));

        let token = token::encode(&Uuid::new_v4());
        assert!(!svc.destroy_authentication_context(&token).await);
        assert!(cache.removes().is_empty());
        assert!(cache.puts().is_empty());
    }

    #[tokio::test]
    async fn destroy_malformed_is_false_without_lookup() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));

        assert!(!svc.destroy_authentication_context("%%%").await);
        assert!(cache.calls().is_empty());
    }

    #[tokio::test]
    async fn destroy_backend_failure_is_false() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));
        let token = svc.create_authentication_context(user()).await.unwrap();
        cache.fail();

        assert!(!svc.destroy_authentication_context(&token).await);
    }

    #[tokio::test]
    async fn set_user_context_writes_identity_once() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));
        let context = AuthenticationContext::new(Uuid::new_v4(), user(), START, 10);
        seed(&cache, &context).await;

        let mut store = RecordingUserStore::default();
        svc.set_user_context(&token::encode(&context.token_id), &mut store)
            .await
            .unwrap();

        assert_eq!(store.writes, vec![context.user.clone()]);
        assert!(cache.removes().is_empty());
    }

    #[tokio::test]
    async fn set_user_context_absent_is_not_found() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));

        let mut store = RecordingUserStore::default();
        let result = svc
            .set_user_context(&token::encode(&Uuid::new_v4()), &mut store)
            .await;

        assert!(matches!(result, Err(AuthError::NotFound)));
        assert!(store.writes.is_empty());
    }

    #[tokio::test]
    async fn set_user_context_malformed_token() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));

        let mut store = RecordingUserStore::default();
        let result = svc.set_user_context("bm90LWEtdXVpZA==", &mut store).await;

        assert!(matches!(result, Err(AuthError::MalformedToken)));
        assert!(store.writes.is_empty());
        assert!(cache.calls().is_empty());
    }

    #[tokio::test]
    async fn set_user_context_expired_even_if_cached() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));
        // expiry in the past, but the cache entry itself lives for ten minutes
        let context = AuthenticationContext::new(Uuid::new_v4(), user(), START - 20_000, 10);
        seed(&cache, &context).await;

        let mut store = RecordingUserStore::default();
        let result = svc
            .set_user_context(&token::encode(&context.token_id), &mut store)
            .await;

        assert!(matches!(result, Err(AuthError::Expired)));
        assert!(store.writes.is_empty());
        // left untouched by default
        assert!(cache.removes().is_empty());
        assert!(
            cache
                .get(&context.token_id.to_string())
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn evict_on_expired_removes_stale_entry() {
        let cache = RecordingCache::new();
        let clock = ManualClock::new(START);
        let config = AuthSessionConfig {
            ttl_seconds: 60,
            evict_on_expired: true,
        };
        let svc = AuthSessionService::with_clock(cache.clone(), config, clock.clone());
        let token = svc.create_authentication_context(user()).await.unwrap();
        clock.advance_secs(61);
        cache.clear_calls();

        let mut store = RecordingUserStore::default();
        let result = svc.set_user_context(&token, &mut store).await;

        assert!(matches!(result, Err(AuthError::Expired)));
        assert_eq!(cache.removes().len(), 1);
        // once evicted it is simply gone
        let result = svc.set_user_context(&token, &mut store).await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn set_user_context_backend_failure() {
        let cache = RecordingCache::new();
        let svc = service(&cache, &ManualClock::new(START));
        let token = svc.create_authentication_context(user()).await.unwrap();
        cache.fail();

        let mut store = RecordingUserStore::default();
        let result = svc.set_user_context(&token, &mut store).await;
        assert!(matches!(result, Err(AuthError::Backend(_))));
        assert!(store.writes.is_empty());
    }

    #[tokio::test]
    async fn token_lifecycle_over_sixty_seconds() {
        let cache = RecordingCache::new();
        let clock = ManualClock::new(START);
        let svc = service(&cache, &clock);
        let input = User::new("reader@example.com", None);

        let token = svc
            .create_authentication_context(input.clone())
            .await
            .unwrap();

        let mut ctx = UserContext::new();
        svc.set_user_context(&token, &mut ctx).await.unwrap();
        assert_eq!(ctx.user(), Some(&input));

        clock.advance_secs(61);

        let mut ctx = UserContext::new();
        let result = svc.set_user_context(&token, &mut ctx).await;
        assert!(matches!(result, Err(AuthError::Expired)));
        assert!(ctx.user().is_none());

        // the cache's own TTL has not kicked in
        let key = token::decode(&token).unwrap().to_string();
        assert!(cache.get(&key).await.unwrap().is_some());

        // destroying an expired-but-present context still succeeds
        assert!(svc.destroy_authentication_context(&token).await);
    }
}
