//! X-AUTH-TOKEN 検証 → UserContext を extensions に入れる
//!
//! - public path はそのまま通す (header も読まない)
//! - それ以外は token を AuthSessionService で検証し、失敗なら 401 で打ち切る
//! - 失敗の種類 (not found / expired / malformed) はログにだけ残す

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::X_AUTH_TOKEN;
use crate::services::auth::{AuthError, UserContext};
use crate::state::AppState;

/// Put every route of `router` behind the token gate.
///
/// ```ignore
/// let app = api::routes();
/// let app = middleware::auth::access::apply(app, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if state.public_routes.matches(original_uri.path()) {
        return Ok(next.run(req).await);
    }

    // Missing or non-ASCII header is the same as an unknown token.
    let Some(token) = req
        .headers()
        .get(X_AUTH_TOKEN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    else {
        tracing::warn!(
            path = %original_uri.path(),
            kind = AuthError::NotFound.kind(),
            "missing auth token"
        );
        return Err(AppError::Unauthorized);
    };

    // fresh per request; dropped with the request
    let mut user_ctx = UserContext::new();

    if let Err(err) = state.auth.set_user_context(&token, &mut user_ctx).await {
        tracing::warn!(
            path = %original_uri.path(),
            kind = err.kind(),
            error = %err,
            "auth token rejected"
        );
        return Err(AppError::Unauthorized);
    }

    tracing::debug!(user_id = ?user_ctx.user_id(), "request authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(user_ctx);

    Ok(next.run(req).await)
}
