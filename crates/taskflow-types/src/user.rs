//! Account and authentication payloads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// Account role within the tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    #[default]
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Member => write!(f, "member"),
        }
    }
}

/// An authenticated user profile.
///
/// The login endpoint returns only `id`, `email`, `username` and `role`;
/// the remaining fields default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Full name if present, otherwise the username, otherwise the email.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else if !self.username.trim().is_empty() {
            self.username.clone()
        } else {
            self.email.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

/// Response of login and register: a token pair plus the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Response of the refresh exchange.
///
/// `refresh` is only present when the server rotates refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_user_subset_parses() {
        let json = r#"{
            "access": "a",
            "refresh": "r",
            "user": {"id": 7, "email": "a@b.com", "username": "ab", "role": "owner"}
        }"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.user.id, 7);
        assert_eq!(resp.user.role, Role::Owner);
        assert!(resp.user.first_name.is_empty());
        assert!(resp.user.created_at.is_none());
    }

    #[test]
    fn test_token_pair_without_rotation() {
        let pair: TokenPair = serde_json::from_str(r#"{"access": "new"}"#).unwrap();
        assert_eq!(pair.access, "new");
        assert!(pair.refresh.is_none());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut user: User =
            serde_json::from_str(r#"{"id": 1, "email": "a@b.com"}"#).unwrap();
        assert_eq!(user.display_name(), "a@b.com");
        user.username = "ab".to_string();
        assert_eq!(user.display_name(), "ab");
        user.first_name = "Ada".to_string();
        user.last_name = "Byron".to_string();
        assert_eq!(user.display_name(), "Ada Byron");
    }
}
