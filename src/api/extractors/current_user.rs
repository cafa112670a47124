use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::repos::user_repo::User;
use crate::services::auth::UserContext;

/// Handler で、認証済み User を受け取るための extractor
/// middleware が UserContext を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す (public route 上で使った・middleware 未設定)
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserContext>()
            .and_then(|ctx| ctx.user().cloned())
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}
