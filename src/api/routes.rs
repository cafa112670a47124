/*
 * Responsibility
 * - URL 構造を定義
 * - /health, /user/{signup,login,logout,me} を登録
 * - 認証の要否は routes ではなく PublicRouteMatcher (middleware::auth) が決める
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    health::health,
    users::{login, logout, me, signup},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/user/signup", post(signup))
        .route("/user/login", post(login))
        .route("/user/logout", post(logout))
        .route("/user/me", get(me))
}
