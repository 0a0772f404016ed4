// ABOUTME: Database operations for author subscriptions
// ABOUTME: Follow/unfollow, follower lookups, and paginated followed-author listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use foodgram_core::{
    errors::{AppError, AppResult},
    models::User,
    pagination::PageRequest,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{users::row_to_user, Database};

impl Database {
    /// Create the subscriptions table
    pub(super) async fn migrate_subscriptions(&self) -> AppResult<()> {
        self.execute_schema(&[
            r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                UNIQUE (user_id, author_id),
                CHECK (user_id <> author_id)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_subscriptions_author ON subscriptions(author_id)",
        ])
        .await
    }
}

/// Subscription storage
pub struct SubscriptionsManager {
    pool: SqlitePool,
}

impl SubscriptionsManager {
    /// Create a new subscriptions manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Subscribe `user_id` to `author_id`; `false` if already subscribed
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails (including self-subscription)
    pub async fn add(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO subscriptions (user_id, author_id) VALUES ($1, $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to subscribe: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a subscription; `false` if there was none
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn remove(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to unsubscribe: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Which of `author_ids` the user follows
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn followed_among(&self, user_id: i64, author_ids: &[i64]) -> AppResult<HashSet<i64>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT author_id FROM subscriptions WHERE user_id = ");
        builder.push_bind(user_id);
        builder.push(" AND author_id IN (");
        let mut ids = builder.separated(", ");
        for id in author_ids {
            ids.push_bind(*id);
        }
        builder.push(")");

        let found: Vec<i64> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load subscriptions: {e}")))?;
        Ok(found.into_iter().collect())
    }

    /// Authors the user follows, in subscription order
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_authors(&self, user_id: i64, page: &PageRequest) -> AppResult<Vec<User>> {
        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.role, u.date_joined
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.user_id = $1
            ORDER BY s.id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(page.sql_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        rows.iter().map(row_to_user).collect()
    }

    /// Number of authors the user follows
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn count(&self, user_id: i64) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?;
        Ok(count as u64)
    }
}
