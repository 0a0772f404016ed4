// ABOUTME: Database operations for recipes, their tags, and ingredient amounts
// ABOUTME: Filtered listings, batched relation loading, and transactional nested writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use foodgram_core::{
    errors::{AppError, AppResult, NON_FIELD_ERRORS},
    models::{IngredientUnit, Recipe, RecipeIngredient, Tag},
    pagination::PageRequest,
};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::warn;

use super::{
    collections::RecipeCollection,
    format_timestamp, parse_timestamp,
    tags::row_to_tag,
    transactions::{retry_on_busy, WRITE_ATTEMPTS},
    unique_violation, Database,
};

const RECIPE_COLUMNS: &str =
    "r.id, r.author_id, r.name, r.text, r.cooking_time, r.image, r.pub_date";

const RECIPE_ORDER: &str = " ORDER BY r.pub_date DESC, r.name, r.id DESC";

impl Database {
    /// Create recipe, recipe-tag, and recipe-ingredient tables
    pub(super) async fn migrate_recipes(&self) -> AppResult<()> {
        self.execute_schema(&[
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                text TEXT NOT NULL,
                cooking_time INTEGER NOT NULL CHECK (cooking_time BETWEEN 1 AND 360),
                image TEXT NOT NULL,
                pub_date TEXT NOT NULL,
                UNIQUE (author_id, name)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_recipes_pub_date ON recipes(pub_date DESC)",
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (recipe_id, tag_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_unit_id INTEGER NOT NULL
                    REFERENCES ingredient_units(id) ON DELETE RESTRICT,
                amount INTEGER NOT NULL CHECK (amount BETWEEN 1 AND 2000),
                UNIQUE (recipe_id, ingredient_unit_id)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_unit ON recipe_ingredients(ingredient_unit_id)",
        ])
        .await
    }
}

/// Listing filter for recipes
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Only recipes by this author
    pub author_id: Option<i64>,
    /// Recipes carrying at least one of these tag slugs
    pub tag_slugs: Vec<String>,
    /// The requesting user, if authenticated
    pub viewer_id: Option<i64>,
    /// Membership in the viewer's favorites
    pub is_favorited: Option<bool>,
    /// Membership in the viewer's shopping cart
    pub is_in_shopping_cart: Option<bool>,
}

/// An ingredient-unit reference with its amount, as submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    /// Ingredient-unit id
    pub ingredient_unit_id: i64,
    /// Quantity
    pub amount: i64,
}

/// Validated recipe contents for a create or full update
#[derive(Debug, Clone)]
pub struct RecipeWrite {
    /// Capitalized name
    pub name: String,
    /// Instructions
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
    /// Stored image path relative to the media root
    pub image: String,
    /// Tag ids, duplicate-free
    pub tag_ids: Vec<i64>,
    /// Ingredient lines, duplicate-free by ingredient-unit
    pub ingredients: Vec<IngredientAmount>,
}

/// Validated partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    /// Capitalized name
    pub name: Option<String>,
    /// Instructions
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
    /// Stored image path
    pub image: Option<String>,
    /// Replacement tag set
    pub tag_ids: Option<Vec<i64>>,
    /// Replacement ingredient lines
    pub ingredients: Option<Vec<IngredientAmount>>,
}

/// Recipe storage
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of recipes matching `filter`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, filter: &RecipeFilter, page: &PageRequest) -> AppResult<Vec<Recipe>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r"));
        push_filters(&mut builder, filter);
        builder.push(RECIPE_ORDER);
        builder.push(" LIMIT ");
        builder.push_bind(page.sql_limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;
        rows.iter().map(row_to_recipe).collect()
    }

    /// Number of recipes matching `filter`
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn count(&self, filter: &RecipeFilter) -> AppResult<u64> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM recipes r");
        push_filters(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;
        Ok(count as u64)
    }

    /// Get a recipe by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"))
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe {recipe_id}: {e}")))?;
        row.as_ref().map(row_to_recipe).transpose()
    }

    /// Newest recipes of an author, at most `limit` when given
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn by_author(&self, author_id: i64, limit: Option<u32>) -> AppResult<Vec<Recipe>> {
        // LIMIT -1 means no limit in SQLite
        let limit = limit.map_or(-1, i64::from);
        let rows = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.author_id = $1{RECIPE_ORDER} LIMIT $2"
        ))
        .bind(author_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list recipes of {author_id}: {e}")))?;
        rows.iter().map(row_to_recipe).collect()
    }

    /// Recipe counts keyed by author; authors without recipes are absent
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn counts_by_author(&self, author_ids: &[i64]) -> AppResult<HashMap<i64, u64>> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT author_id, COUNT(*) AS total FROM recipes WHERE author_id IN (");
        let mut ids = builder.separated(", ");
        for id in author_ids {
            ids.push_bind(*id);
        }
        builder.push(") GROUP BY author_id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;
        Ok(rows
            .iter()
            .map(|row| {
                let total: i64 = row.get("total");
                (row.get("author_id"), total as u64)
            })
            .collect())
    }

    /// Tags of several recipes, each list ordered by tag name
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn tags_for(&self, recipe_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Tag>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r"
            SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id IN (",
        );
        let mut ids = builder.separated(", ");
        for id in recipe_ids {
            ids.push_bind(*id);
        }
        builder.push(") ORDER BY t.name, t.id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe tags: {e}")))?;

        let mut tags: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in &rows {
            tags.entry(row.get("recipe_id")).or_default().push(row_to_tag(row));
        }
        Ok(tags)
    }

    /// Ingredient lines of several recipes, each list in submission order
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn ingredients_for(
        &self,
        recipe_ids: &[i64],
    ) -> AppResult<HashMap<i64, Vec<RecipeIngredient>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            r"
            SELECT ri.recipe_id, iu.id AS id, i.name AS name,
                   mu.name AS measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredient_units iu ON iu.id = ri.ingredient_unit_id
            JOIN ingredients i ON i.id = iu.ingredient_id
            JOIN measurement_units mu ON mu.id = iu.measurement_unit_id
            WHERE ri.recipe_id IN (",
        );
        let mut ids = builder.separated(", ");
        for id in recipe_ids {
            ids.push_bind(*id);
        }
        builder.push(") ORDER BY ri.id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe ingredients: {e}")))?;

        let mut lines: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
        for row in &rows {
            lines
                .entry(row.get("recipe_id"))
                .or_default()
                .push(RecipeIngredient {
                    id: row.get("id"),
                    name: row.get("name"),
                    measurement_unit: row.get("measurement_unit"),
                    amount: row.get("amount"),
                });
        }
        Ok(lines)
    }

    /// Whether the author already has a recipe with this name
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn name_taken(
        &self,
        author_id: i64,
        name: &str,
        exclude_recipe_id: Option<i64>,
    ) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            r"
            SELECT 1 FROM recipes
            WHERE author_id = $1 AND name = $2 AND ($3 IS NULL OR id <> $3)
            LIMIT 1
            ",
        )
        .bind(author_id)
        .bind(name)
        .bind(exclude_recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check recipe name: {e}")))?;
        Ok(found.is_some())
    }

    /// Insert a recipe with its tags and ingredient lines in one transaction
    ///
    /// # Errors
    ///
    /// Returns a validation error when the transaction fails
    pub async fn create(&self, author_id: i64, write: &RecipeWrite) -> AppResult<Recipe> {
        let pub_date = Utc::now();
        let recipe_id = retry_on_busy(
            || self.insert_recipe(author_id, write, pub_date),
            WRITE_ATTEMPTS,
        )
        .await
        .map_err(write_error)?;

        Ok(Recipe {
            id: recipe_id,
            author_id,
            name: write.name.clone(),
            text: write.text.clone(),
            cooking_time: write.cooking_time,
            image: write.image.clone(),
            pub_date,
        })
    }

    async fn insert_recipe(
        &self,
        author_id: i64,
        write: &RecipeWrite,
        pub_date: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let recipe_id = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, text, cooking_time, image, pub_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(author_id)
        .bind(&write.name)
        .bind(&write.text)
        .bind(write.cooking_time)
        .bind(&write.image)
        .bind(format_timestamp(pub_date))
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        replace_tags(&mut tx, recipe_id, &write.tag_ids).await?;
        replace_ingredients(&mut tx, recipe_id, &write.ingredients).await?;
        tx.commit().await?;
        Ok(recipe_id)
    }

    /// Apply `changes` in one transaction; tag and ingredient sets are replaced wholesale
    ///
    /// Returns `None` when the recipe does not exist.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the transaction fails
    pub async fn update(&self, recipe_id: i64, changes: &RecipeChanges) -> AppResult<Option<Recipe>> {
        let updated = retry_on_busy(|| self.apply_changes(recipe_id, changes), WRITE_ATTEMPTS)
            .await
            .map_err(write_error)?;
        if !updated {
            return Ok(None);
        }
        self.get(recipe_id).await
    }

    async fn apply_changes(&self, recipe_id: i64, changes: &RecipeChanges) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r"
            UPDATE recipes SET
                name = COALESCE($1, name),
                text = COALESCE($2, text),
                cooking_time = COALESCE($3, cooking_time),
                image = COALESCE($4, image)
            WHERE id = $5
            ",
        )
        .bind(changes.name.as_deref())
        .bind(changes.text.as_deref())
        .bind(changes.cooking_time)
        .bind(changes.image.as_deref())
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(tag_ids) = &changes.tag_ids {
            replace_tags(&mut tx, recipe_id, tag_ids).await?;
        }
        if let Some(ingredients) = &changes.ingredients {
            replace_ingredients(&mut tx, recipe_id, ingredients).await?;
        }
        tx.commit().await?;
        Ok(true)
    }

    /// Delete a recipe; join rows cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe {recipe_id}: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Every ingredient line of every recipe in the user's shopping cart
    ///
    /// One row per (recipe, ingredient-unit); summing is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn cart_ingredient_rows(&self, user_id: i64) -> AppResult<Vec<(IngredientUnit, i64)>> {
        let rows = sqlx::query(
            r"
            SELECT iu.id AS id, i.name AS name, mu.name AS measurement_unit, ri.amount
            FROM shopping_cart sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredient_units iu ON iu.id = ri.ingredient_unit_id
            JOIN ingredients i ON i.id = iu.ingredient_id
            JOIN measurement_units mu ON mu.id = iu.measurement_unit_id
            WHERE sc.user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load shopping cart: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| {
                let unit = IngredientUnit {
                    id: row.get("id"),
                    name: row.get("name"),
                    measurement_unit: row.get("measurement_unit"),
                };
                (unit, row.get("amount"))
            })
            .collect())
    }
}

async fn replace_tags(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    tag_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;
    for tag_id in tag_ids {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn replace_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredients: &[IngredientAmount],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;
    for line in ingredients {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_unit_id, amount) VALUES ($1, $2, $3)",
        )
        .bind(recipe_id)
        .bind(line.ingredient_unit_id)
        .bind(line.amount)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &'a RecipeFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(author_id) = filter.author_id {
        builder.push(" AND r.author_id = ");
        builder.push_bind(author_id);
    }
    if !filter.tag_slugs.is_empty() {
        builder.push(
            " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.recipe_id = r.id AND t.slug IN (",
        );
        let mut slugs = builder.separated(", ");
        for slug in &filter.tag_slugs {
            slugs.push_bind(slug.as_str());
        }
        builder.push("))");
    }
    push_membership(builder, RecipeCollection::Favorites, filter.is_favorited, filter.viewer_id);
    push_membership(
        builder,
        RecipeCollection::ShoppingCart,
        filter.is_in_shopping_cart,
        filter.viewer_id,
    );
}

fn push_membership(
    builder: &mut QueryBuilder<'_, Sqlite>,
    collection: RecipeCollection,
    wanted: Option<bool>,
    viewer_id: Option<i64>,
) {
    match (wanted, viewer_id) {
        // Anonymous viewers have no memberships
        (None, _) | (Some(false), None) => {}
        (Some(true), None) => {
            builder.push(" AND 0");
        }
        (Some(wanted), Some(viewer_id)) => {
            builder.push(if wanted { " AND EXISTS (" } else { " AND NOT EXISTS (" });
            builder.push(format!(
                "SELECT 1 FROM {} c WHERE c.recipe_id = r.id AND c.user_id = ",
                collection.table()
            ));
            builder.push_bind(viewer_id);
            builder.push(")");
        }
    }
}

/// Nested write failures are reported as validation errors
fn write_error(error: sqlx::Error) -> AppError {
    if let Some(columns) = unique_violation(&error) {
        if columns.contains("recipes.name") {
            return AppError::field("name", "You already have a recipe with this name.");
        }
        if columns.contains("recipe_ingredients.") {
            return AppError::field("ingredients", "Ingredients must not repeat.");
        }
        if columns.contains("recipe_tags.") {
            return AppError::field("tags", "Tags must not repeat.");
        }
    }
    if error
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
    {
        return AppError::field(NON_FIELD_ERRORS, "Referenced ingredient or tag does not exist.");
    }
    if error
        .as_database_error()
        .is_some_and(|db| db.is_check_violation())
    {
        return AppError::field(NON_FIELD_ERRORS, "A value is out of the allowed range.");
    }

    warn!(error = %error, "Recipe write transaction failed");
    AppError::field(NON_FIELD_ERRORS, "Failed to save recipe.")
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let pub_date: String = row.get("pub_date");
    Ok(Recipe {
        id: row.get("id"),
        author_id: row.get("author_id"),
        name: row.get("name"),
        text: row.get("text"),
        cooking_time: row.get("cooking_time"),
        image: row.get("image"),
        pub_date: parse_timestamp(&pub_date)?,
    })
}
