// ABOUTME: Shared server state handed to every route as axum state
// ABOUTME: Bundles the database, auth manager, media storage, and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Server Resources
//!
//! Built once at startup and shared behind an `Arc`. Everything inside is
//! immutable; request state lives in the database.

use std::sync::Arc;

use foodgram_core::errors::AppResult;

use crate::{
    auth::AuthManager, config::environment::ServerConfig, database::Database,
    services::images::MediaStorage,
};

/// Centralized resource container for dependency injection
#[derive(Clone, Debug)]
pub struct ServerResources {
    /// Database and per-domain managers
    pub database: Arc<Database>,
    /// Password hashing and token resolution
    pub auth: Arc<AuthManager>,
    /// Uploaded image storage
    pub media: Arc<MediaStorage>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources around an open database
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        Self {
            database: Arc::new(database),
            auth: Arc::new(AuthManager::new(config.auth.bcrypt_cost)),
            media: Arc::new(MediaStorage::new(&config.media)),
            config: Arc::new(config),
        }
    }

    /// Connect to the configured database, run migrations, and assemble resources
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let database = Database::new(&config.database.url, config.database.max_connections).await?;
        Ok(Self::new(database, config))
    }
}
