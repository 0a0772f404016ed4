// ABOUTME: Read-only ingredient route handlers
// ABOUTME: Lists ingredient-unit pairs with optional name search and fetches one by id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use foodgram_core::errors::AppError;
use serde::Deserialize;

use super::extract::parse_id;
use crate::resources::ServerResources;

/// Ingredient search parameters
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix or fragment
    pub name: Option<String>,
}

/// Ingredient routes implementation
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients/", get(Self::handle_list))
            .route("/api/ingredients/:id/", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /api/ingredients/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<IngredientQuery>,
    ) -> Result<Response, AppError> {
        let units = resources
            .database
            .ingredients()
            .list_units(query.name.as_deref())
            .await?;
        Ok(Json(units).into_response())
    }

    /// Handle GET /api/ingredients/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let unit = resources
            .database
            .ingredients()
            .get_unit(parse_id(&id, "Ingredient")?)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient"))?;
        Ok(Json(unit).into_response())
    }
}
