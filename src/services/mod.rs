// ABOUTME: Domain service layer between route handlers and storage
// ABOUTME: Validation, representation assembly, cart aggregation, and media handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Domain service layer
//!
//! Route handlers stay thin: they authenticate, call into a service, and
//! convert the result into a response body.

/// Registration, password changes, and credential checks
pub mod accounts;

/// JSON fixture import for the ingredient and tag catalogs
pub mod catalog;

/// Per-viewer favorite, cart, and subscription flags
pub mod annotation;

/// Followed-author summaries with recipe previews
pub mod authors;

/// Base64 image decoding and media storage
pub mod images;

/// Recipe submission validation
pub mod recipe_write;

/// Full recipe assembly from batched queries
pub mod recipes;

/// Shopping list aggregation and rendering
pub mod shopping_cart;
