// ABOUTME: Assembly of full recipe representations from batched queries
// ABOUTME: Joins authors, tags, ingredient lines, and viewer flags onto recipe rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use foodgram_core::{
    errors::{AppError, AppResult},
    models::{Recipe, RecipeIngredient, Tag, User},
};

use super::annotation::ViewerContext;
use crate::database::Database;

/// A recipe with everything its representation needs
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    /// Recipe row
    pub recipe: Recipe,
    /// Author account
    pub author: User,
    /// Whether the viewer follows the author
    pub author_is_subscribed: bool,
    /// Tags ordered by name
    pub tags: Vec<Tag>,
    /// Ingredient lines in submission order
    pub ingredients: Vec<RecipeIngredient>,
    /// Whether the viewer favorited the recipe
    pub is_favorited: bool,
    /// Whether the recipe is in the viewer's cart
    pub is_in_shopping_cart: bool,
}

/// Attach relations and viewer flags to `recipes`, preserving order
///
/// Runs a fixed number of queries regardless of batch size.
///
/// # Errors
///
/// Returns an error if any query fails
pub async fn load_details(
    database: &Database,
    viewer: Option<&User>,
    recipes: Vec<Recipe>,
) -> AppResult<Vec<RecipeDetails>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<i64> = recipes.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let manager = database.recipes();
    let authors = database.users().get_many(&author_ids).await?;
    let mut tags = manager.tags_for(&recipe_ids).await?;
    let mut ingredients = manager.ingredients_for(&recipe_ids).await?;
    let viewer_context = ViewerContext::load(database, viewer, &recipe_ids, &author_ids).await?;

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors
                .get(&recipe.author_id)
                .cloned()
                .ok_or_else(|| {
                    AppError::internal(format!(
                        "Author {} of recipe {} missing",
                        recipe.author_id, recipe.id
                    ))
                })?;
            Ok(RecipeDetails {
                author_is_subscribed: viewer_context.is_subscribed(author.id),
                tags: tags.remove(&recipe.id).unwrap_or_default(),
                ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                is_favorited: viewer_context.is_favorited(recipe.id),
                is_in_shopping_cart: viewer_context.is_in_shopping_cart(recipe.id),
                author,
                recipe,
            })
        })
        .collect()
}

/// Load one recipe with its relations
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown id, or a database error
pub async fn load_one(
    database: &Database,
    viewer: Option<&User>,
    recipe_id: i64,
) -> AppResult<RecipeDetails> {
    let recipe = database
        .recipes()
        .get(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;
    load_details(database, viewer, vec![recipe])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Recipe"))
}
