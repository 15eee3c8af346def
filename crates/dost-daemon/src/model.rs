//! Account types shared by storage, auth and handlers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role given to accounts that register without one
pub const DEFAULT_ROLE: &str = "student";

/// Registered account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    /// Normalized with [`normalize_email`]
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: &str,
        password_hash: String,
        display_name: impl Into<String>,
        role: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash,
            display_name: display_name.into(),
            role: role
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            is_verified: true,
            created_at: Utc::now(),
        }
    }

    /// Public view carried in tokens and responses
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id.to_string(),
            role: self.role.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub role: String,
    pub email: String,
    pub display_name: String,
}

/// Emails compare case-insensitively and without surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
