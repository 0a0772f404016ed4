// ABOUTME: Read-only tag route handlers
// ABOUTME: Lists all tags unpaginated and fetches one by id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use foodgram_core::errors::AppError;

use super::extract::parse_id;
use crate::resources::ServerResources;

/// Tag routes implementation
pub struct TagRoutes;

impl TagRoutes {
    /// Create tag routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/tags/", get(Self::handle_list))
            .route("/api/tags/:id/", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /api/tags/
    async fn handle_list(State(resources): State<Arc<ServerResources>>) -> Result<Response, AppError> {
        let tags = resources.database.tags().list().await?;
        Ok(Json(tags).into_response())
    }

    /// Handle GET /api/tags/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let tag = resources
            .database
            .tags()
            .get(parse_id(&id, "Tag")?)
            .await?
            .ok_or_else(|| AppError::not_found("Tag"))?;
        Ok(Json(tag).into_response())
    }
}
