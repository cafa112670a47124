/*
 * Responsibility
 * - /user 系 handler (signup / login / logout / me)
 * - token の発行・破棄は AuthSessionService に委譲する
 * - login はパスワード検証をしない (email で provisioning 済みの User を引くだけ)
 */
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, StatusCode},
};

use crate::{
    api::dto::users::{AuthResponse, LoginRequest, SignupRequest, UserResponse},
    api::extractors::CurrentUser,
    error::AppError,
    middleware::auth::X_AUTH_TOKEN,
    repos::user_repo::User,
    state::AppState,
};

type TokenIssued = (StatusCode, [(HeaderName, String); 1], Json<AuthResponse>);

async fn issue_token(
    state: &AppState,
    user: User,
    status: StatusCode,
) -> Result<TokenIssued, AppError> {
    let token = state.auth.create_authentication_context(user.clone()).await?;

    Ok((
        status,
        [(X_AUTH_TOKEN, token.clone())],
        Json(AuthResponse {
            token,
            expires_in: state.auth.ttl_seconds(),
            user: user.into(),
        }),
    ))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<TokenIssued, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let user = state.users.create(&req.email, req.name.as_deref())?;
    tracing::info!(user_id = %user.id, "user signed up");

    issue_token(&state, user, StatusCode::CREATED).await
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<TokenIssued, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let Some(user) = state.users.find_by_email(&req.email) else {
        tracing::info!("login for unknown email");
        return Err(AppError::Unauthorized);
    };

    issue_token(&state, user, StatusCode::OK).await
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = headers
        .get(X_AUTH_TOKEN)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    // A concurrent logout may have won the race; the token is gone either way.
    if state.auth.destroy_authentication_context(token).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Unauthorized)
    }
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
