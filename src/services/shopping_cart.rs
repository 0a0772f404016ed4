// ABOUTME: Shopping list aggregation over the recipes in a user's cart
// ABOUTME: Sums amounts per ingredient-unit and renders the downloadable text file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashMap;

use foodgram_core::{errors::AppResult, models::IngredientUnit};

use crate::database::Database;

/// Total amount of one ingredient-unit across the cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    /// Ingredient and its unit
    pub ingredient: IngredientUnit,
    /// Sum of amounts over all cart recipes
    pub total: i64,
}

/// Sum amounts keyed by ingredient-unit id, sorted by name then unit
pub fn aggregate(rows: impl IntoIterator<Item = (IngredientUnit, i64)>) -> Vec<ShoppingListLine> {
    let mut totals: HashMap<i64, ShoppingListLine> = HashMap::new();
    for (ingredient, amount) in rows {
        totals
            .entry(ingredient.id)
            .and_modify(|line| line.total += amount)
            .or_insert(ShoppingListLine {
                ingredient,
                total: amount,
            });
    }

    let mut lines: Vec<ShoppingListLine> = totals.into_values().collect();
    lines.sort_by(|a, b| {
        a.ingredient
            .name
            .cmp(&b.ingredient.name)
            .then_with(|| a.ingredient.measurement_unit.cmp(&b.ingredient.measurement_unit))
    });
    lines
}

/// One `name (unit): total` line per ingredient; empty input gives an empty file
#[must_use]
pub fn render(lines: &[ShoppingListLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{}: {}\n", line.ingredient, line.total))
        .collect()
}

/// Build the shopping list text for a user's cart
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded
pub async fn shopping_list(database: &Database, user_id: i64) -> AppResult<String> {
    let rows = database.recipes().cart_ingredient_rows(user_id).await?;
    Ok(render(&aggregate(rows)))
}
