/*
 * Responsibility
 * - users の保持 (in-process, email をキーに一意)
 * - 認証済み主体 (User) の最小プロフィールを提供する
 * - パスワード検証はしない (provisioning のみ)
 */
use dashmap::{DashMap, mapref::entry::Entry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

/// Minimal profile of an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl User {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserRepo {
    by_email: Arc<DashMap<String, User>>,
}

impl UserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    // Emails are compared case-insensitively.
    fn key(email: &str) -> String {
        email.trim().to_ascii_lowercase()
    }

    pub fn create(&self, email: &str, name: Option<&str>) -> RepoResult<User> {
        match self.by_email.entry(Self::key(email)) {
            Entry::Occupied(_) => Err(RepoError::Conflict),
            Entry::Vacant(slot) => {
                let user = User::new(email.trim(), name.map(str::to_string));
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.by_email
            .get(&Self::key(email))
            .map(|entry| entry.value().clone())
    }
}
