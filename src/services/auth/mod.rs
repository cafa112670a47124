pub mod clock;
pub mod context;
pub mod context_cache;
pub mod error;
pub mod factory;
pub mod session;
pub mod token;
pub mod user_context;

#[cfg(test)]
pub mod testing;

pub use context_cache::AuthContextCache;
pub use error::AuthError;
pub use factory::build_auth_service;
pub use session::{AuthSessionConfig, AuthSessionService};
pub use user_context::UserContext;
