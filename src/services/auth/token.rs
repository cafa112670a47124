/*
 * Responsibility
 * - token id (UUID) <-> external token (Base64 text) conversion
 * - the only place that knows the wire form of the X-AUTH-TOKEN value
 */
use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed auth token")]
    Malformed,
}

/// Generate a fresh, process-unique token id.
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Base64 of the hyphenated textual form of `token_id`.
pub fn encode(token_id: &Uuid) -> String {
    STANDARD.encode(token_id.hyphenated().to_string())
}

pub fn decode(external_token: &str) -> Result<Uuid, TokenError> {
    let bytes = STANDARD
        .decode(external_token.trim())
        .map_err(|_| TokenError::Malformed)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| TokenError::Malformed)?;
    let token_id = Uuid::try_parse(text).map_err(|_| TokenError::Malformed)?;

    // Only the form `encode` produces; simple, braced, urn or uppercase
    // spellings of the same id are different tokens.
    if token_id.hyphenated().to_string() != text {
        return Err(TokenError::Malformed);
    }
    Ok(token_id)
}
