//! Test doubles for the auth services.
use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicI64, Ordering},
};
use std::time::Duration;

use crate::repos::user_repo::User;
use crate::services::auth::{
    clock::Clock,
    context::AuthenticationContext,
    context_cache::{AuthContextCache, CacheBackedContextStore},
    user_context::UserContextStore,
};
use crate::services::cache::{CacheError, InMemoryClient};

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(start_millis),
        })
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.fetch_add(secs * 1000, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheCall {
    Put {
        key: String,
        value: AuthenticationContext,
        ttl: Duration,
    },
    Get(String),
    Remove(Vec<String>),
}

/// Real in-memory store that also records every call.
///
/// Its own TTL bookkeeping runs on tokio time, so moving a `ManualClock`
/// leaves entries retrievable past their `expiry_at`.
pub struct RecordingCache {
    inner: CacheBackedContextStore<InMemoryClient>,
    calls: Mutex<Vec<CacheCall>>,
    failing: AtomicBool,
}

impl RecordingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: CacheBackedContextStore::in_memory("test"),
            calls: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        })
    }

    /// Make every subsequent call fail with a backend error.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<CacheCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn puts(&self) -> Vec<CacheCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, CacheCall::Put { .. }))
            .collect()
    }

    pub fn removes(&self) -> Vec<CacheCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, CacheCall::Remove(_)))
            .collect()
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::BackendConnection("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthContextCache for RecordingCache {
    async fn put(
        &self,
        key: &str,
        value: &AuthenticationContext,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.calls.lock().unwrap().push(CacheCall::Put {
            key: key.to_string(),
            value: value.clone(),
            ttl,
        });
        self.check()?;
        self.inner.put(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<AuthenticationContext>, CacheError> {
        self.calls
            .lock()
            .unwrap()
            .push(CacheCall::Get(key.to_string()));
        self.check()?;
        self.inner.get(key).await
    }

    async fn remove(&self, keys: &[String]) -> Result<(), CacheError> {
        self.calls
            .lock()
            .unwrap()
            .push(CacheCall::Remove(keys.to_vec()));
        self.check()?;
        self.inner.remove(keys).await
    }
}

/// Identity slot that counts writes.
#[derive(Debug, Default)]
pub struct RecordingUserStore {
    pub writes: Vec<User>,
}

impl UserContextStore for RecordingUserStore {
    fn set_user(&mut self, user: User) {
        self.writes.push(user);
    }
}
