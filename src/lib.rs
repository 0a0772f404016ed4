// ABOUTME: Main library entry point for the Foodgram recipe sharing backend
// ABOUTME: Provides the REST API, persistence, authentication, and media handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![deny(unsafe_code)]

//! # Foodgram Server
//!
//! A recipe sharing backend. Users publish recipes with tags, ingredients
//! and an image, follow other authors, keep favorites, and collect recipes
//! into a shopping cart that can be downloaded as an aggregated ingredient
//! list.
//!
//! ## Architecture
//!
//! - **Routes**: thin axum handlers per domain
//! - **Services**: validation and response assembly shared by handlers
//! - **Database**: `SQLite` storage with one manager per domain
//! - **Auth**: bcrypt passwords and opaque token keys
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use foodgram_server::{config::environment::ServerConfig, resources::ServerResources, server::FoodgramServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let port = config.http_port;
//!     let resources = Arc::new(ServerResources::from_config(config).await?);
//!     FoodgramServer::new(resources).run(port).await
//! }
//! ```

/// Password hashing and token authentication
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// `SQLite` persistence and schema
pub mod database;

/// Structured logging setup
pub mod logging;

/// CORS, tracing, and request-id layers
pub mod middleware;

/// Shared state handed to handlers
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Domain logic used by the route handlers and the CLI
pub mod services;

/// Error types shared with the core crate
pub use foodgram_core::errors;
