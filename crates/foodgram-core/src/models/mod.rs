// ABOUTME: Core data models for the Foodgram recipe platform
// ABOUTME: Re-exports User, Tag, Ingredient, Recipe and related structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Data Models
//!
//! Plain data structures shared by the storage layer, services, and routes.
//! Identifiers are database row ids (`i64`).
//!
//! ## Core Models
//!
//! - `User`: account with role and credentials hash
//! - `Tag`: recipe category with color and slug
//! - `IngredientUnit`: ingredient paired with its measurement unit
//! - `Recipe`: recipe header; tags and ingredient amounts are loaded separately
//! - `RecipeIngredient`: one ingredient-unit line of a recipe with its amount

mod ingredient;
mod recipe;
mod tag;
mod user;

pub use ingredient::{Ingredient, IngredientUnit, MeasurementUnit};
pub use recipe::{Recipe, RecipeIngredient};
pub use tag::Tag;
pub use user::{User, UserRole};
