use thiserror::Error;

use crate::services::{auth::token::TokenError, cache::CacheError};

/// Why a token could not be turned into an identity.
///
/// Request-scoped only. Callers at the HTTP edge collapse every variant to 401;
/// the variant itself is for logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth context not found")]
    NotFound,

    #[error("auth context expired")]
    Expired,

    #[error("malformed auth token")]
    MalformedToken,

    #[error("auth context backend failure: {0}")]
    Backend(#[from] CacheError),
}

impl AuthError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::NotFound => "not_found",
            AuthError::Expired => "expired",
            AuthError::MalformedToken => "malformed_token",
            AuthError::Backend(_) => "backend",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(_: TokenError) -> Self {
        AuthError::MalformedToken
    }
}
