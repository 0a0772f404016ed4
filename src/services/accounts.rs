// ABOUTME: Registration and password-change validation for user accounts
// ABOUTME: Enforces email, username, and password rules before anything is stored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::LazyLock;

use foodgram_core::{
    constants::{
        limits::{EMAIL_MAX_LENGTH, MIN_PASSWORD_LENGTH, USER_FIELD_MAX_LENGTH},
        messages::{FIELD_BLANK, FIELD_REQUIRED, INVALID_CREDENTIALS},
    },
    errors::{AppError, AppResult, FieldErrors, NON_FIELD_ERRORS},
    models::{User, UserRole},
};
use regex::Regex;
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::AuthManager,
    database::{Database, NewUser},
};

static USERNAME_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$"));

static EMAIL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));

/// Registration body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationPayload {
    /// Login email
    pub email: Option<String>,
    /// Public handle
    pub username: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Plaintext password
    pub password: Option<String>,
}

/// Normalize an email for storage and lookup
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Problems with a candidate password; empty when acceptable
#[must_use]
pub fn password_problems(password: &str, username: &str, email: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_owned());
    }
    let lowered = password.to_lowercase();
    let local_part = email.split('@').next().unwrap_or_default();
    if (!username.is_empty() && lowered == username.to_lowercase())
        || (!local_part.is_empty() && lowered == local_part.to_lowercase())
        || (!email.is_empty() && lowered == email.to_lowercase())
    {
        problems.push("The password is too similar to the username or email.".to_owned());
    }
    problems
}

fn pattern(regex: &'static LazyLock<Result<Regex, regex::Error>>) -> AppResult<&'static Regex> {
    regex
        .as_ref()
        .map_err(|e| AppError::internal(format!("Invalid validation pattern: {e}")))
}

fn required_text(
    value: Option<String>,
    field: &str,
    max_length: usize,
    errors: &mut FieldErrors,
) -> Option<String> {
    let Some(value) = value.map(|v| v.trim().to_owned()) else {
        errors.add(field, FIELD_REQUIRED);
        return None;
    };
    if value.is_empty() {
        errors.add(field, FIELD_BLANK);
        return None;
    }
    if value.chars().count() > max_length {
        errors.add(
            field,
            format!("Ensure this field has no more than {max_length} characters."),
        );
        return None;
    }
    Some(value)
}

/// Validate a registration and create the account
///
/// # Errors
///
/// Returns `ValidationFailed` with every problem found, or a database error
pub async fn register(
    database: &Database,
    auth: &AuthManager,
    payload: RegistrationPayload,
    role: UserRole,
) -> AppResult<User> {
    let mut errors = FieldErrors::new();

    let email = required_text(payload.email, "email", EMAIL_MAX_LENGTH, &mut errors)
        .map(|email| normalize_email(&email));
    if let Some(email) = &email {
        if !pattern(&EMAIL_PATTERN)?.is_match(email) {
            errors.add("email", "Enter a valid email address.");
        } else if database.users().email_exists(email).await? {
            errors.add("email", "A user with that email already exists.");
        }
    }

    let username = required_text(payload.username, "username", USER_FIELD_MAX_LENGTH, &mut errors);
    if let Some(username) = &username {
        if !pattern(&USERNAME_PATTERN)?.is_match(username) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        } else if database.users().username_exists(username).await? {
            errors.add("username", "A user with that username already exists.");
        }
    }

    let first_name = required_text(payload.first_name, "first_name", USER_FIELD_MAX_LENGTH, &mut errors);
    let last_name = required_text(payload.last_name, "last_name", USER_FIELD_MAX_LENGTH, &mut errors);

    let password = match payload.password {
        None => {
            errors.add("password", FIELD_REQUIRED);
            None
        }
        Some(password) => {
            for problem in password_problems(
                &password,
                username.as_deref().unwrap_or_default(),
                email.as_deref().unwrap_or_default(),
            ) {
                errors.add("password", problem);
            }
            Some(password)
        }
    };

    let (Some(email), Some(username), Some(first_name), Some(last_name), Some(password), true) =
        (email, username, first_name, last_name, password, errors.is_empty())
    else {
        return Err(AppError::validation(errors));
    };

    let user = database
        .users()
        .create(&NewUser {
            email,
            username,
            first_name,
            last_name,
            password_hash: auth.hash_password(&password).await?,
            role,
        })
        .await?;
    info!(user_id = user.id, role = %user.role, "Registered user");
    Ok(user)
}

/// Set password body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetPasswordPayload {
    /// Password in use now
    pub current_password: Option<String>,
    /// Replacement password
    pub new_password: Option<String>,
}

/// Verify the current password and store the new one
///
/// # Errors
///
/// Returns `ValidationFailed` when a field is missing, the current password is
/// wrong, or the new password breaks the rules; or a database error
pub async fn change_password(
    database: &Database,
    auth: &AuthManager,
    user: &User,
    payload: SetPasswordPayload,
) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    let current = payload.current_password;
    let new = payload.new_password;
    if current.is_none() {
        errors.add("current_password", FIELD_REQUIRED);
    }
    if new.is_none() {
        errors.add("new_password", FIELD_REQUIRED);
    }
    let (Some(current), Some(new)) = (current, new) else {
        return Err(AppError::validation(errors));
    };

    if !auth.verify_password(&current, &user.password_hash).await {
        errors.add("current_password", "Invalid password.");
    }
    if new == current {
        errors.add("new_password", "The new password must differ from the current one.");
    }
    for problem in password_problems(&new, &user.username, &user.email) {
        errors.add("new_password", problem);
    }
    errors.into_result()?;

    let hash = auth.hash_password(&new).await?;
    database.users().update_password(user.id, &hash).await?;
    info!(user_id = user.id, "Password changed");
    Ok(())
}

/// Check login credentials
///
/// # Errors
///
/// Returns a non-field validation error for unknown emails or wrong passwords
pub async fn verify_credentials(
    database: &Database,
    auth: &AuthManager,
    email: &str,
    password: &str,
) -> AppResult<User> {
    let invalid = || AppError::field(NON_FIELD_ERRORS, INVALID_CREDENTIALS);
    let user = database
        .users()
        .get_by_email(&normalize_email(email))
        .await?
        .ok_or_else(invalid)?;
    if auth.verify_password(password, &user.password_hash).await {
        Ok(user)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        assert!(password_problems("s3cure-passphrase", "cook", "cook@example.com").is_empty());
        assert_eq!(password_problems("short", "cook", "cook@example.com").len(), 1);
        assert!(!password_problems("1234567890", "cook", "cook@example.com").is_empty());
        assert!(!password_problems("chefchef", "ChefChef", "x@example.com").is_empty());
        assert!(!password_problems("anna.cook", "someone", "anna.cook@example.com").is_empty());
    }

    #[test]
    fn test_patterns_compile_and_match() {
        let username = pattern(&USERNAME_PATTERN).unwrap();
        assert!(username.is_match("chef.anna+1@home"));
        assert!(!username.is_match("chef anna"));
        let email = pattern(&EMAIL_PATTERN).unwrap();
        assert!(email.is_match("anna@example.com"));
        assert!(!email.is_match("anna@example"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Anna@Example.COM "), "anna@example.com");
    }
}
