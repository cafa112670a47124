/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: auth: AuthSessionService, public_routes: PublicRouteMatcher, users: UserRepo
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::middleware::auth::public_routes::PublicRouteMatcher;
use crate::repos::user_repo::UserRepo;
use crate::services::auth::AuthSessionService;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthSessionService>,
    pub public_routes: Arc<PublicRouteMatcher>,
    pub users: UserRepo,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthSessionService>,
        public_routes: PublicRouteMatcher,
        users: UserRepo,
    ) -> Self {
        Self {
            auth,
            public_routes: Arc::new(public_routes),
            users,
        }
    }
}
