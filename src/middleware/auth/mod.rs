use axum::http::HeaderName;

pub mod access;
pub mod public_routes;

/// Request header carrying the external (Base64) auth token.
pub const X_AUTH_TOKEN: HeaderName = HeaderName::from_static("x-auth-token");
