// ABOUTME: Database connection management and schema migrations
// ABOUTME: Owns the SQLite pool and hands out per-domain managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Database Management
//!
//! A single SQLite pool backs every domain manager. Each domain file owns its
//! tables through a `migrate_*` method that runs idempotent
//! `CREATE TABLE IF NOT EXISTS` statements on startup.

/// Favorites and shopping cart membership
pub mod collections;
/// Measurement units, ingredients, and ingredient-unit pairs
pub mod ingredients;
/// Recipes with their tags and ingredient amounts
pub mod recipes;
/// Author subscriptions
pub mod subscriptions;
/// Recipe tags
pub mod tags;
/// Authentication tokens
pub mod tokens;
/// Retry helper for write transactions
pub mod transactions;
/// User accounts
pub mod users;

pub use collections::{CollectionsManager, RecipeCollection};
pub use ingredients::IngredientsManager;
pub use recipes::{IngredientAmount, RecipeChanges, RecipeFilter, RecipeWrite, RecipesManager};
pub use subscriptions::SubscriptionsManager;
pub use tags::{NewTag, TagsManager};
pub use tokens::TokensManager;
pub use users::{NewUser, UsersManager};

use std::{str::FromStr, time::Duration};

use chrono::{DateTime, SecondsFormat, Utc};
use foodgram_core::errors::{AppError, AppResult};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tracing::{debug, info};

/// Database manager holding the connection pool
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// `sqlite::memory:` URLs get a single, never-recycled connection: every
    /// SQLite connection to `:memory:` is its own database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or a migration fails
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");
        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL {database_url}: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::config(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(in_memory, "Database initialized");
        Ok(db)
    }

    /// Connection pool for managers and ad-hoc queries
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run all migrations in dependency order
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_tokens().await?;
        self.migrate_subscriptions().await?;
        self.migrate_tags().await?;
        self.migrate_ingredients().await?;
        self.migrate_recipes().await?;
        self.migrate_collections().await?;
        debug!("Database migrations complete");
        Ok(())
    }

    /// Cheap connectivity check for readiness probes
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// User accounts
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Authentication tokens
    #[must_use]
    pub fn tokens(&self) -> TokensManager {
        TokensManager::new(self.pool.clone())
    }

    /// Author subscriptions
    #[must_use]
    pub fn subscriptions(&self) -> SubscriptionsManager {
        SubscriptionsManager::new(self.pool.clone())
    }

    /// Recipe tags
    #[must_use]
    pub fn tags(&self) -> TagsManager {
        TagsManager::new(self.pool.clone())
    }

    /// Ingredients and units
    #[must_use]
    pub fn ingredients(&self) -> IngredientsManager {
        IngredientsManager::new(self.pool.clone())
    }

    /// Recipes
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// Favorites and shopping cart
    #[must_use]
    pub fn collections(&self) -> CollectionsManager {
        CollectionsManager::new(self.pool.clone())
    }

    async fn execute_schema(&self, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }
}

/// Timestamp encoding with fixed width so text ordering matches time ordering
pub(crate) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a timestamp written by [`format_timestamp`]
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid timestamp {value}: {e}")))
}

/// Column named by a UNIQUE constraint violation, e.g. `users.email`
pub(crate) fn unique_violation(error: &sqlx::Error) -> Option<String> {
    let db_error = error.as_database_error()?;
    if !db_error.is_unique_violation() {
        return None;
    }
    Some(
        db_error
            .message()
            .rsplit(": ")
            .next()
            .unwrap_or_default()
            .to_owned(),
    )
}
