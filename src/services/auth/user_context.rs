/*
 * Responsibility
 * - Request-scoped holder for the authenticated identity
 * - The gate creates one per request and stores it in that request's extensions;
 *   it is dropped together with the request, so nothing carries over between
 *   requests served by the same worker.
 */
use uuid::Uuid;

use crate::repos::user_repo::User;

/// Write side of the identity slot, used by `AuthSessionService`.
pub trait UserContextStore {
    fn set_user(&mut self, user: User);
}

#[derive(Debug, Clone, Default)]
pub struct UserContext {
    user: Option<User>,
}

impl UserContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id)
    }
}

impl UserContextStore for UserContext {
    fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }
}
