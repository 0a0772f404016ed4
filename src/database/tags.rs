// ABOUTME: Database operations for recipe tags
// ABOUTME: Listing, lookup, existence checks, and creation for the data loader
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use foodgram_core::{
    errors::{AppError, AppResult},
    models::Tag,
};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};

use super::{unique_violation, Database};

impl Database {
    /// Create the tags table
    pub(super) async fn migrate_tags(&self) -> AppResult<()> {
        self.execute_schema(&[r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                color TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE
            )
            "])
        .await
    }
}

/// Normalized tag fields for insertion
#[derive(Debug, Clone)]
pub struct NewTag {
    /// Capitalized name
    pub name: String,
    /// Uppercase `#RRGGBB`
    pub color: String,
    /// Slug
    pub slug: String,
}

/// Tag storage
pub struct TagsManager {
    pool: SqlitePool,
}

impl TagsManager {
    /// Create a new tags manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All tags ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, color, slug FROM tags ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))?;
        Ok(rows.iter().map(row_to_tag).collect())
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, tag_id: i64) -> AppResult<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, color, slug FROM tags WHERE id = $1")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag {tag_id}: {e}")))?;
        Ok(row.as_ref().map(row_to_tag))
    }

    /// Which of `tag_ids` exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn existing_ids(&self, tag_ids: &[i64]) -> AppResult<HashSet<i64>> {
        if tag_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT id FROM tags WHERE id IN (");
        let mut ids = builder.separated(", ");
        for id in tag_ids {
            ids.push_bind(*id);
        }
        builder.push(")");

        let found: Vec<i64> = builder
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check tags: {e}")))?;
        Ok(found.into_iter().collect())
    }

    /// Insert a tag
    ///
    /// # Errors
    ///
    /// Returns a field error when name, color, or slug is taken, or a database error
    pub async fn create(&self, tag: &NewTag) -> AppResult<Tag> {
        let result = sqlx::query("INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3)")
            .bind(&tag.name)
            .bind(&tag.color)
            .bind(&tag.slug)
            .execute(&self.pool)
            .await
            .map_err(|e| match unique_violation(&e).as_deref() {
                Some("tags.name") => AppError::field("name", "A tag with this name already exists."),
                Some("tags.color") => {
                    AppError::field("color", "A tag with this color already exists.")
                }
                Some("tags.slug") => AppError::field("slug", "A tag with this slug already exists."),
                _ => AppError::database(format!("Failed to create tag: {e}")),
            })?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: tag.name.clone(),
            color: tag.color.clone(),
            slug: tag.slug.clone(),
        })
    }
}

pub(crate) fn row_to_tag(row: &SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        color: row.get("color"),
        slug: row.get("slug"),
    }
}
