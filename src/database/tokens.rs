// ABOUTME: Database operations for opaque authentication tokens
// ABOUTME: Stores only SHA-256 digests; a user may hold several tokens at once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::Utc;
use foodgram_core::{
    errors::{AppError, AppResult},
    models::User,
};
use sqlx::SqlitePool;

use super::{format_timestamp, users::row_to_user, Database};

impl Database {
    /// Create the auth tokens table
    pub(super) async fn migrate_tokens(&self) -> AppResult<()> {
        self.execute_schema(&[
            r"
            CREATE TABLE IF NOT EXISTS auth_tokens (
                token_hash TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_auth_tokens_user ON auth_tokens(user_id)",
        ])
        .await
    }
}

/// Authentication token storage
pub struct TokensManager {
    pool: SqlitePool,
}

impl TokensManager {
    /// Create a new tokens manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a token digest for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, user_id: i64, token_hash: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO auth_tokens (token_hash, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(token_hash)
            .bind(user_id)
            .bind(format_timestamp(Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to store token: {e}")))?;
        Ok(())
    }

    /// Resolve a token digest to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn find_user(&self, token_hash: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.role, u.date_joined
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            ",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to resolve token: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Revoke a single token
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, token_hash: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to revoke token: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}
