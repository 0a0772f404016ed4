// ABOUTME: Opaque token authentication and password hashing
// ABOUTME: Resolves Authorization headers to users; bcrypt runs on the blocking pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Authentication
//!
//! Clients log in with email and password and receive a random 40-hex-digit
//! key. Only the SHA-256 digest of a key is stored, so a database leak does
//! not leak usable credentials. Requests present the key as
//! `Authorization: Token <key>` (or `Bearer <key>`).

use axum::http::{header::AUTHORIZATION, HeaderMap};
use foodgram_core::{
    constants::{limits, messages},
    errors::{AppError, AppResult},
    models::User,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::database::Database;

/// Accepted `Authorization` schemes
const AUTH_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// Password hashing and token resolution
#[derive(Debug, Clone)]
pub struct AuthManager {
    bcrypt_cost: u32,
}

impl AuthManager {
    /// Create an auth manager hashing with the given bcrypt cost
    #[must_use]
    pub const fn new(bcrypt_cost: u32) -> Self {
        Self { bcrypt_cost }
    }

    /// Hash a password on the blocking thread pool
    ///
    /// # Errors
    ///
    /// Returns an internal error if hashing fails or the task panics
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Check a password against a stored hash; malformed hashes never match
    pub async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .unwrap_or(false)
    }

    /// Issue a new token for `user_id` and return the plaintext key
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be stored
    pub async fn issue_token(&self, database: &Database, user_id: i64) -> AppResult<String> {
        let key = generate_token();
        database.tokens().create(user_id, &hash_token(&key)).await?;
        debug!(user_id, "Issued auth token");
        Ok(key)
    }

    /// Resolve the request's credentials, if any
    ///
    /// No `Authorization` header means anonymous. A header that is present
    /// but malformed, or names an unknown token, is rejected.
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` for bad credentials or a database error
    pub async fn authenticate_optional(
        &self,
        database: &Database,
        headers: &HeaderMap,
    ) -> AppResult<Option<User>> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(None);
        };
        let value = value
            .to_str()
            .map_err(|_| AppError::auth_invalid(messages::INVALID_TOKEN))?;
        let key = parse_authorization(value)
            .ok_or_else(|| AppError::auth_invalid(messages::INVALID_TOKEN))?;

        database
            .tokens()
            .find_user(&hash_token(key))
            .await?
            .map(Some)
            .ok_or_else(|| AppError::auth_invalid(messages::INVALID_TOKEN))
    }

    /// Resolve the request's credentials, requiring a user
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without credentials, `AuthInvalid` for bad ones
    pub async fn authenticate(&self, database: &Database, headers: &HeaderMap) -> AppResult<User> {
        self.authenticate_optional(database, headers)
            .await?
            .ok_or_else(AppError::auth_required)
    }

    /// Revoke the token presented in `headers`
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when no usable token is present, or a database error
    pub async fn revoke(&self, database: &Database, headers: &HeaderMap) -> AppResult<()> {
        let key = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_authorization)
            .ok_or_else(AppError::auth_required)?;
        database.tokens().delete(&hash_token(key)).await?;
        Ok(())
    }
}

/// 20 random bytes, hex encoded
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0_u8; limits::AUTH_TOKEN_HEX_LENGTH / 2];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 digest of a token key, hex encoded
#[must_use]
pub fn hash_token(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Extract the key from `Token <key>` or `Bearer <key>`
fn parse_authorization(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    if !AUTH_SCHEMES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(scheme))
    {
        return None;
    }
    let key = key.trim();
    (key.len() == limits::AUTH_TOKEN_HEX_LENGTH && key.bytes().all(|b| b.is_ascii_hexdigit()))
        .then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_hex_and_unique() {
        let first = generate_token();
        let second = generate_token();
        assert_eq!(first.len(), limits::AUTH_TOKEN_HEX_LENGTH);
        assert!(first.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_parse_authorization_schemes() {
        let key = "a".repeat(limits::AUTH_TOKEN_HEX_LENGTH);
        assert_eq!(parse_authorization(&format!("Token {key}")), Some(key.as_str()));
        assert_eq!(parse_authorization(&format!("bearer {key}")), Some(key.as_str()));
        assert_eq!(parse_authorization(&format!("Basic {key}")), None);
        assert_eq!(parse_authorization("Token short"), None);
        assert_eq!(parse_authorization(&key), None);
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
        assert_eq!(hash_token("abc").len(), 64);
    }

    #[tokio::test]
    async fn test_password_round_trip() {
        let auth = AuthManager::new(limits::MIN_BCRYPT_COST);
        let hash = auth.hash_password("correct horse").await.unwrap();
        assert!(auth.verify_password("correct horse", &hash).await);
        assert!(!auth.verify_password("wrong horse", &hash).await);
        assert!(!auth.verify_password("anything", "not-a-hash").await);
    }
}
