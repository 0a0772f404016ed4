// ABOUTME: Route module organization for the Foodgram REST API
// ABOUTME: One router per domain, merged by the server module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Route module for Foodgram
//!
//! Each domain module holds route definitions and thin handlers that
//! delegate to the service layer and the database managers. Every router
//! carries its own state so they can be merged without further wiring.

/// Token login and logout
pub mod auth;
/// Shared extractors and request parsing helpers
pub mod extract;
/// Liveness and readiness
pub mod health;
/// Ingredient catalog
pub mod ingredients;
/// Recipes, favorites, and the shopping cart
pub mod recipes;
/// JSON response bodies
pub mod responses;
/// Tag catalog
pub mod tags;
/// Users, passwords, and subscriptions
pub mod users;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use tags::TagRoutes;
pub use users::UserRoutes;
