// ABOUTME: Per-viewer flags for recipe and author representations
// ABOUTME: Loads favorites, cart, and subscription membership for a batch in three queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use foodgram_core::{errors::AppResult, models::User};

use crate::database::{Database, RecipeCollection};

/// Membership sets of the requesting user over the rendered batch
///
/// Anonymous viewers get empty sets, so every flag reads `false`.
#[derive(Debug, Clone, Default)]
pub struct ViewerContext {
    favorites: HashSet<i64>,
    shopping_cart: HashSet<i64>,
    following: HashSet<i64>,
}

impl ViewerContext {
    /// Load flags for `recipe_ids` and `author_ids` as seen by `viewer`
    ///
    /// # Errors
    ///
    /// Returns an error if a membership query fails
    pub async fn load(
        database: &Database,
        viewer: Option<&User>,
        recipe_ids: &[i64],
        author_ids: &[i64],
    ) -> AppResult<Self> {
        let Some(viewer) = viewer else {
            return Ok(Self::default());
        };
        let collections = database.collections();
        Ok(Self {
            favorites: collections
                .recipe_ids_among(RecipeCollection::Favorites, viewer.id, recipe_ids)
                .await?,
            shopping_cart: collections
                .recipe_ids_among(RecipeCollection::ShoppingCart, viewer.id, recipe_ids)
                .await?,
            following: database
                .subscriptions()
                .followed_among(viewer.id, author_ids)
                .await?,
        })
    }

    /// Whether the viewer favorited the recipe
    #[must_use]
    pub fn is_favorited(&self, recipe_id: i64) -> bool {
        self.favorites.contains(&recipe_id)
    }

    /// Whether the recipe is in the viewer's cart
    #[must_use]
    pub fn is_in_shopping_cart(&self, recipe_id: i64) -> bool {
        self.shopping_cart.contains(&recipe_id)
    }

    /// Whether the viewer follows the author
    #[must_use]
    pub fn is_subscribed(&self, author_id: i64) -> bool {
        self.following.contains(&author_id)
    }
}
