// ABOUTME: Ingredient, measurement unit, and ingredient-unit pairing models
// ABOUTME: Recipes reference ingredient-unit pairs, never bare ingredients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Measurement unit such as `g` or `tbsp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementUnit {
    /// Row id
    pub id: i64,
    /// Unit name, stored lowercase
    pub name: String,
}

/// Ingredient without a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Row id
    pub id: i64,
    /// Ingredient name, stored capitalized
    pub name: String,
}

/// An ingredient measured in a specific unit
///
/// This is what the API exposes as an "ingredient" and what recipes reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientUnit {
    /// Row id of the pairing
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Unit name
    pub measurement_unit: String,
}

impl Display for IngredientUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.measurement_unit)
    }
}
