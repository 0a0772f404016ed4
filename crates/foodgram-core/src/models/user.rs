// ABOUTME: User account model and role enumeration
// ABOUTME: Roles gate editing of other users' recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user; may edit only their own recipes
    #[default]
    User,
    /// Administrator; may edit any recipe
    Admin,
}

impl UserRole {
    /// Get string representation for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse from database string representation, defaulting to `User`
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }

    /// Whether this role may modify content owned by others
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Row id
    pub id: i64,
    /// Login identifier, unique
    pub email: String,
    /// Public handle, unique
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Account role
    pub role: UserRole,
    /// Registration time
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Whether `user` may modify content authored by `author_id`
    #[must_use]
    pub const fn can_modify(&self, author_id: i64) -> bool {
        self.id == author_id || self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            email: format!("user{id}@example.com"),
            username: format!("user{id}"),
            first_name: "First".to_owned(),
            last_name: "Last".to_owned(),
            password_hash: String::new(),
            role,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::parse(UserRole::Admin.as_str()), UserRole::Admin);
        assert_eq!(UserRole::parse("unknown"), UserRole::User);
    }

    #[test]
    fn test_owner_or_admin_can_modify() {
        assert!(user(1, UserRole::User).can_modify(1));
        assert!(!user(2, UserRole::User).can_modify(1));
        assert!(user(3, UserRole::Admin).can_modify(1));
    }
}
