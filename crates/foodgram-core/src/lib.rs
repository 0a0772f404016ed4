// ABOUTME: Core types and constants for the Foodgram recipe-sharing platform
// ABOUTME: Foundation crate with error handling, pagination, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![deny(unsafe_code)]

//! # Foodgram Core
//!
//! Foundation crate providing shared types and constants for the Foodgram
//! backend. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and per-field validation errors
//! - **constants**: Domain limits, defaults, and user-facing messages
//! - **pagination**: Page-number pagination for list endpoints
//! - **models**: Users, tags, ingredients, and recipes
//! - **text**: Name normalization and slug generation

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Page-number pagination for list endpoints
pub mod pagination;

/// Core data models (User, Tag, Ingredient, Recipe)
pub mod models;

/// Text normalization helpers shared by storage and validation
pub mod text;
