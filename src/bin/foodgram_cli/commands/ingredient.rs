// ABOUTME: Ingredient catalog commands for foodgram-cli
// ABOUTME: Removes ingredient-unit pairs that no recipe references
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use foodgram_server::{database::Database, errors::AppError};
use tracing::info;

use crate::Result;

/// Delete ingredient-unit `id`
pub async fn remove(database: &Database, id: i64) -> Result<()> {
    if !database.ingredients().delete_unit(id).await? {
        return Err(AppError::not_found(format!("Ingredient {id}")));
    }
    info!(ingredient_unit_id = id, "Ingredient removed");
    println!("Ingredient {id} removed");
    Ok(())
}
