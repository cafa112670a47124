/*
 * Responsibility
 * - /user 系の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::User;

const EMAIL_MAX_LEN: usize = 254;
const NAME_MAX_LEN: usize = 128;

fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("email is required");
    }
    if email.len() > EMAIL_MAX_LEN {
        return Err("email must be <= 254 chars");
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err("email is invalid"),
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_email(&self.email)?;
        if let Some(name) = &self.name
            && name.len() > NAME_MAX_LEN
        {
            return Err("name must be <= 128 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_email(&self.email)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
    pub user: UserResponse,
}
