// ABOUTME: Assembly of followed-author representations for the subscriptions endpoints
// ABOUTME: Attaches recent recipes, recipe counts, and the viewer's subscription flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use foodgram_core::{
    errors::AppResult,
    models::{Recipe, User},
};

use super::annotation::ViewerContext;
use crate::database::Database;

/// An author with a preview of their recipes
#[derive(Debug, Clone)]
pub struct AuthorSummary {
    /// Author account
    pub author: User,
    /// Whether the viewer follows the author
    pub is_subscribed: bool,
    /// Newest recipes, truncated to the requested limit
    pub recipes: Vec<Recipe>,
    /// Total number of recipes by the author
    pub recipes_count: u64,
}

/// Build summaries for `authors`, preserving order
///
/// # Errors
///
/// Returns an error if any query fails
pub async fn load_summaries(
    database: &Database,
    viewer: Option<&User>,
    authors: Vec<User>,
    recipes_limit: Option<u32>,
) -> AppResult<Vec<AuthorSummary>> {
    let author_ids: Vec<i64> = authors.iter().map(|a| a.id).collect();
    let manager = database.recipes();
    let counts = manager.counts_by_author(&author_ids).await?;
    let viewer_context = ViewerContext::load(database, viewer, &[], &author_ids).await?;

    let mut summaries = Vec::with_capacity(authors.len());
    for author in authors {
        let recipes = manager.by_author(author.id, recipes_limit).await?;
        summaries.push(AuthorSummary {
            is_subscribed: viewer_context.is_subscribed(author.id),
            recipes_count: counts.get(&author.id).copied().unwrap_or(0),
            recipes,
            author,
        });
    }
    Ok(summaries)
}
