// ABOUTME: Recipe header and recipe ingredient line models
// ABOUTME: Tags and ingredient amounts are stored in join tables and loaded on demand
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recipe row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Row id
    pub id: i64,
    /// Author user id
    pub author_id: i64,
    /// Recipe name, unique per author
    pub name: String,
    /// Preparation instructions
    pub text: String,
    /// Minutes, 1..=360
    pub cooking_time: i64,
    /// Image path relative to the media root
    pub image: String,
    /// Publication time
    pub pub_date: DateTime<Utc>,
}

/// One ingredient-unit used by a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Ingredient-unit id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Unit name
    pub measurement_unit: String,
    /// Quantity, 1..=2000
    pub amount: i64,
}
