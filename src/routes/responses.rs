// ABOUTME: Wire representations returned by the REST API
// ABOUTME: Converts models and assembled service results into JSON bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use foodgram_core::models::{Recipe, RecipeIngredient, Tag, User};
use serde::{Deserialize, Serialize};

use crate::services::{authors::AuthorSummary, images::MediaStorage, recipes::RecipeDetails};

/// User as seen by another user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Email
    pub email: String,
    /// Id
    pub id: i64,
    /// Username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the requesting user follows this user
    pub is_subscribed: bool,
}

impl UserResponse {
    /// Build from a user and the viewer's subscription flag
    #[must_use]
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Registration result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUserResponse {
    /// Email
    pub email: String,
    /// Id
    pub id: i64,
    /// Username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Token login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Plaintext key for the `Authorization: Token` header
    pub auth_token: String,
}

/// Full recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Id
    pub id: i64,
    /// Tags ordered by name
    pub tags: Vec<Tag>,
    /// Author
    pub author: UserResponse,
    /// Ingredient lines with amounts
    pub ingredients: Vec<RecipeIngredient>,
    /// In the viewer's favorites
    pub is_favorited: bool,
    /// In the viewer's shopping cart
    pub is_in_shopping_cart: bool,
    /// Name
    pub name: String,
    /// Image URL
    pub image: String,
    /// Instructions
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
}

impl RecipeResponse {
    /// Render assembled details, resolving the image URL
    #[must_use]
    pub fn new(details: RecipeDetails, media: &MediaStorage) -> Self {
        Self {
            id: details.recipe.id,
            tags: details.tags,
            author: UserResponse::new(details.author, details.author_is_subscribed),
            ingredients: details.ingredients,
            is_favorited: details.is_favorited,
            is_in_shopping_cart: details.is_in_shopping_cart,
            name: details.recipe.name,
            image: media.url(&details.recipe.image),
            text: details.recipe.text,
            cooking_time: details.recipe.cooking_time,
        }
    }
}

/// Short recipe used by favorites, cart, and subscription listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefRecipeResponse {
    /// Id
    pub id: i64,
    /// Name
    pub name: String,
    /// Image URL
    pub image: String,
    /// Minutes
    pub cooking_time: i64,
}

impl BriefRecipeResponse {
    /// Render a recipe row, resolving the image URL
    #[must_use]
    pub fn new(recipe: Recipe, media: &MediaStorage) -> Self {
        Self {
            id: recipe.id,
            image: media.url(&recipe.image),
            name: recipe.name,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Followed author with a recipe preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    /// Author fields
    #[serde(flatten)]
    pub author: UserResponse,
    /// Newest recipes
    pub recipes: Vec<BriefRecipeResponse>,
    /// Total recipes by the author
    pub recipes_count: u64,
}

impl SubscriptionResponse {
    /// Render an author summary
    #[must_use]
    pub fn new(summary: AuthorSummary, media: &MediaStorage) -> Self {
        Self {
            author: UserResponse::new(summary.author, summary.is_subscribed),
            recipes: summary
                .recipes
                .into_iter()
                .map(|recipe| BriefRecipeResponse::new(recipe, media))
                .collect(),
            recipes_count: summary.recipes_count,
        }
    }
}
