// ABOUTME: Database operations for per-user recipe collections
// ABOUTME: Favorites and the shopping cart share one table shape and one manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
};

use foodgram_core::errors::{AppError, AppResult};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::Database;

impl Database {
    /// Create the favorites and shopping cart tables
    pub(super) async fn migrate_collections(&self) -> AppResult<()> {
        self.execute_schema(&[
            r"
            CREATE TABLE IF NOT EXISTS favorites (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                UNIQUE (user_id, recipe_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS shopping_cart (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                UNIQUE (user_id, recipe_id)
            )
            ",
        ])
        .await
    }
}

/// A per-user set of recipes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCollection {
    /// Favorited recipes
    Favorites,
    /// Recipes whose ingredients go on the shopping list
    ShoppingCart,
}

impl RecipeCollection {
    /// Backing table
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping_cart",
        }
    }
}

impl Display for RecipeCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Favorites => f.write_str("favorites"),
            Self::ShoppingCart => f.write_str("shopping cart"),
        }
    }
}

/// Favorites and shopping cart storage
pub struct CollectionsManager {
    pool: SqlitePool,
}

impl CollectionsManager {
    /// Create a new collections manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a recipe; `false` if it was already there
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn add(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "INSERT OR IGNORE INTO {} (user_id, recipe_id) VALUES ($1, $2)",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add to {collection}: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a recipe; `false` if it was not there
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn remove(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to remove from {collection}: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Which of `recipe_ids` are in the user's collection
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn recipe_ids_among(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> AppResult<HashSet<i64>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT recipe_id FROM {} WHERE user_id = ",
            collection.table()
        ));
        builder.push_bind(user_id);
        builder.push(" AND recipe_id IN (");
        let mut ids = builder.separated(", ");
        for id in recipe_ids {
            ids.push_bind(*id);
        }
        builder.push(")");

        let found: Vec<i64> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load {collection}: {e}")))?;
        Ok(found.into_iter().collect())
    }
}
