use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::User;

/// Server-side record binding a token id to a user and a validity window.
///
/// Times are epoch milliseconds. `expiry_at` is always strictly after `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationContext {
    pub token_id: Uuid,
    pub user: User,
    pub created_at: i64,
    pub expiry_at: i64,
}

impl AuthenticationContext {
    pub fn new(token_id: Uuid, user: User, created_at: i64, ttl_seconds: u64) -> Self {
        let ttl_millis = i64::try_from(ttl_seconds.max(1))
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);

        Self {
            token_id,
            user,
            created_at,
            expiry_at: created_at.saturating_add(ttl_millis),
        }
    }

    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        self.expiry_at <= now_millis
    }
}
