// ABOUTME: Database operations for measurement units, ingredients, and ingredient-unit pairs
// ABOUTME: Name search is case-insensitive for any script and favors prefix matches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use foodgram_core::{
    errors::{AppError, AppResult},
    models::IngredientUnit,
};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};

use super::Database;

const INGREDIENT_UNIT_SELECT: &str = r"
    SELECT iu.id AS id, i.name AS name, mu.name AS measurement_unit
    FROM ingredient_units iu
    JOIN ingredients i ON i.id = iu.ingredient_id
    JOIN measurement_units mu ON mu.id = iu.measurement_unit_id
";

impl Database {
    /// Create measurement unit, ingredient, and pairing tables
    pub(super) async fn migrate_ingredients(&self) -> AppResult<()> {
        self.execute_schema(&[
            r"
            CREATE TABLE IF NOT EXISTS measurement_units (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                search_name TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS ingredient_units (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                measurement_unit_id INTEGER NOT NULL REFERENCES measurement_units(id) ON DELETE CASCADE,
                UNIQUE (ingredient_id, measurement_unit_id)
            )
            ",
        ])
        .await
    }
}

/// Ingredient storage
pub struct IngredientsManager {
    pool: SqlitePool,
}

impl IngredientsManager {
    /// Create a new ingredients manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Ingredient-unit pairs ordered by ingredient then unit
    ///
    /// With a `name` query, keeps pairs whose ingredient name starts with or
    /// contains it (case-insensitive); prefix matches come first. SQLite only
    /// folds ASCII case, so names are matched against `search_name`, which
    /// holds the Unicode-lowercased name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_units(&self, name: Option<&str>) -> AppResult<Vec<IngredientUnit>> {
        let needle = name
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let rows = match needle {
            None => {
                sqlx::query(&format!("{INGREDIENT_UNIT_SELECT} ORDER BY i.name, mu.name"))
                    .fetch_all(&self.pool)
                    .await
            }
            Some(needle) => {
                sqlx::query(&format!(
                    "{INGREDIENT_UNIT_SELECT} WHERE instr(i.search_name, $1) > 0 \
                     ORDER BY instr(i.search_name, $2) = 1 DESC, i.name, mu.name"
                ))
                .bind(&needle)
                .bind(&needle)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;
        Ok(rows.iter().map(row_to_ingredient_unit).collect())
    }

    /// Get an ingredient-unit pair by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_unit(&self, unit_id: i64) -> AppResult<Option<IngredientUnit>> {
        let row = sqlx::query(&format!("{INGREDIENT_UNIT_SELECT} WHERE iu.id = $1"))
            .bind(unit_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get ingredient {unit_id}: {e}")))?;
        Ok(row.as_ref().map(row_to_ingredient_unit))
    }

    /// Which of `unit_ids` exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn existing_unit_ids(&self, unit_ids: &[i64]) -> AppResult<HashSet<i64>> {
        if unit_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id FROM ingredient_units WHERE id IN (");
        let mut ids = builder.separated(", ");
        for id in unit_ids {
            ids.push_bind(*id);
        }
        builder.push(")");

        let found: Vec<i64> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check ingredients: {e}")))?;
        Ok(found.into_iter().collect())
    }

    /// Id of a measurement unit, inserting it when missing
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn ensure_measurement_unit(&self, name: &str) -> AppResult<i64> {
        self.ensure_named("measurement_units", name).await
    }

    /// Id of an ingredient, inserting it when missing
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn ensure_ingredient(&self, name: &str) -> AppResult<i64> {
        sqlx::query("INSERT OR IGNORE INTO ingredients (name, search_name) VALUES ($1, $2)")
            .bind(name)
            .bind(name.to_lowercase())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert into ingredients: {e}")))?;
        self.named_id("ingredients", name).await
    }

    async fn ensure_named(&self, table: &'static str, name: &str) -> AppResult<i64> {
        sqlx::query(&format!("INSERT OR IGNORE INTO {table} (name) VALUES ($1)"))
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert into {table}: {e}")))?;
        self.named_id(table, name).await
    }

    async fn named_id(&self, table: &'static str, name: &str) -> AppResult<i64> {
        sqlx::query_scalar(&format!("SELECT id FROM {table} WHERE name = $1"))
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to read {table}: {e}")))
    }

    /// Pair an ingredient with a unit; returns the pair id and whether it was new
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn ensure_ingredient_unit(
        &self,
        ingredient_id: i64,
        measurement_unit_id: i64,
    ) -> AppResult<(i64, bool)> {
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO ingredient_units (ingredient_id, measurement_unit_id) VALUES ($1, $2)",
        )
        .bind(ingredient_id)
        .bind(measurement_unit_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to pair ingredient and unit: {e}")))?
        .rows_affected()
            > 0;

        let id = sqlx::query_scalar(
            "SELECT id FROM ingredient_units WHERE ingredient_id = $1 AND measurement_unit_id = $2",
        )
        .bind(ingredient_id)
        .bind(measurement_unit_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read ingredient pair: {e}")))?;
        Ok((id, inserted))
    }

    /// Delete an ingredient-unit pair unless a recipe still uses it
    ///
    /// # Errors
    ///
    /// Returns a validation error when the pair is in use, or a database error
    pub async fn delete_unit(&self, unit_id: i64) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let in_use: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM recipe_ingredients WHERE ingredient_unit_id = $1 LIMIT 1")
                .bind(unit_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to check ingredient {unit_id}: {e}")))?;
        if in_use.is_some() {
            return Err(AppError::invalid_input(
                "Ingredient is used by at least one recipe.",
            ));
        }

        let result = sqlx::query("DELETE FROM ingredient_units WHERE id = $1")
            .bind(unit_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete ingredient {unit_id}: {e}")))?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_ingredient_unit(row: &SqliteRow) -> IngredientUnit {
    IngredientUnit {
        id: row.get("id"),
        name: row.get("name"),
        measurement_unit: row.get("measurement_unit"),
    }
}
