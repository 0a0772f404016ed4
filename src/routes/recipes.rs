// ABOUTME: Recipe route handlers including favorites, shopping cart, and list download
// ABOUTME: Filtered listing, nested create and update, and per-user recipe collections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Recipe routes
//!
//! Reads are open to anonymous clients. Writes require a token, and only the
//! author or an administrator may change or delete a recipe. A stored image
//! is written before the database row and removed again if the row write
//! fails, so the media directory never keeps files for failed submissions.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::Query;
use foodgram_core::{
    constants::defaults::SHOPPING_LIST_FILENAME,
    errors::{AppError, AppResult},
    models::{Recipe, User},
};
use serde::Deserialize;
use tracing::info;

use super::{
    extract::{page_request, paginate, parse_bool, parse_id, AppJson},
    responses::{BriefRecipeResponse, RecipeResponse},
};
use crate::{
    database::{RecipeCollection, RecipeFilter},
    resources::ServerResources,
    services::{
        recipe_write::{self, RecipePayload, WriteMode},
        recipes, shopping_cart,
    },
};

/// Recipe listing parameters; `tags` may repeat
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// Author id
    pub author: Option<String>,
    /// Tag slugs, any of which must match
    #[serde(default)]
    pub tags: Vec<String>,
    /// `1`/`0` filter on the viewer's favorites
    pub is_favorited: Option<String>,
    /// `1`/`0` filter on the viewer's shopping cart
    pub is_in_shopping_cart: Option<String>,
}

/// Recipe routes implementation
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes/",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/download_shopping_cart/",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id/",
                get(Self::handle_get)
                    .put(Self::handle_replace)
                    .patch(Self::handle_partial_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/favorite/",
                post(Self::handle_favorite_add).delete(Self::handle_favorite_remove),
            )
            .route(
                "/api/recipes/:id/shopping_cart/",
                post(Self::handle_cart_add).delete(Self::handle_cart_remove),
            )
            .with_state(resources)
    }

    /// Handle GET /api/recipes/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        Query(query): Query<RecipeListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = resources
            .auth
            .authenticate_optional(&resources.database, &headers)
            .await?;
        let page = page_request(
            query.page.as_deref(),
            query.limit.as_deref(),
            &resources.config.pagination,
        )?;

        let author_id = query
            .author
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| AppError::field("author", "Enter a valid author id."))
            })
            .transpose()?;
        let filter = RecipeFilter {
            author_id,
            tag_slugs: query
                .tags
                .into_iter()
                .map(|slug| slug.trim().to_owned())
                .filter(|slug| !slug.is_empty())
                .collect(),
            viewer_id: viewer.as_ref().map(|v| v.id),
            is_favorited: parse_bool("is_favorited", query.is_favorited.as_deref())?,
            is_in_shopping_cart: parse_bool(
                "is_in_shopping_cart",
                query.is_in_shopping_cart.as_deref(),
            )?,
        };

        let store = resources.database.recipes();
        let count = store.count(&filter).await?;
        let found = store.list(&filter, &page).await?;

        let results = recipes::load_details(&resources.database, viewer.as_ref(), found)
            .await?
            .into_iter()
            .map(|details| RecipeResponse::new(details, &resources.media))
            .collect();
        Ok(Json(paginate(&uri, &page, count, results)?).into_response())
    }

    /// Handle GET /api/recipes/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let viewer = resources
            .auth
            .authenticate_optional(&resources.database, &headers)
            .await?;
        let recipe_id = parse_id(&id, "Recipe")?;
        let details = recipes::load_one(&resources.database, viewer.as_ref(), recipe_id).await?;
        Ok(Json(RecipeResponse::new(details, &resources.media)).into_response())
    }

    /// Handle POST /api/recipes/
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        AppJson(body): AppJson<RecipePayload>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        let mut validated =
            recipe_write::validate(&resources.database, body, WriteMode::Create, user.id, None)
                .await?;

        let image = validated
            .image
            .take()
            .ok_or_else(|| AppError::internal("Validated recipe lacks image"))?;
        let stored = resources.media.save_recipe_image(&image).await?;

        let created = match validated.into_write(stored.clone()) {
            Ok(write) => resources.database.recipes().create(user.id, &write).await,
            Err(e) => Err(e),
        };
        let recipe = match created {
            Ok(recipe) => recipe,
            Err(e) => {
                resources.media.remove(&stored).await;
                return Err(e);
            }
        };
        info!(recipe_id = recipe.id, author_id = user.id, "Recipe created");

        let details = recipes::load_one(&resources.database, Some(&user), recipe.id).await?;
        Ok((
            StatusCode::CREATED,
            Json(RecipeResponse::new(details, &resources.media)),
        )
            .into_response())
    }

    /// Handle PUT /api/recipes/:id/
    async fn handle_replace(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        AppJson(body): AppJson<RecipePayload>,
    ) -> Result<Response, AppError> {
        Self::update(&resources, &headers, &id, body, WriteMode::Replace).await
    }

    /// Handle PATCH /api/recipes/:id/
    async fn handle_partial_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        AppJson(body): AppJson<RecipePayload>,
    ) -> Result<Response, AppError> {
        Self::update(&resources, &headers, &id, body, WriteMode::Partial).await
    }

    async fn update(
        resources: &ServerResources,
        headers: &HeaderMap,
        id: &str,
        body: RecipePayload,
        mode: WriteMode,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, headers)
            .await?;
        let recipe = Self::load_modifiable(resources, &user, id).await?;

        // Name uniqueness is per author, so check against the recipe's author
        // even when an administrator is editing
        let mut validated = recipe_write::validate(
            &resources.database,
            body,
            mode,
            recipe.author_id,
            Some(recipe.id),
        )
        .await?;

        let stored = match validated.image.take() {
            Some(image) => Some(resources.media.save_recipe_image(&image).await?),
            None => None,
        };
        let changes = validated.into_changes(stored.clone());

        match resources.database.recipes().update(recipe.id, &changes).await {
            Ok(Some(_)) => {
                if stored.is_some() {
                    resources.media.remove(&recipe.image).await;
                }
            }
            outcome => {
                if let Some(path) = &stored {
                    resources.media.remove(path).await;
                }
                outcome?;
                return Err(AppError::not_found("Recipe"));
            }
        }
        info!(recipe_id = recipe.id, user_id = user.id, ?mode, "Recipe updated");

        let details = recipes::load_one(&resources.database, Some(&user), recipe.id).await?;
        Ok(Json(RecipeResponse::new(details, &resources.media)).into_response())
    }

    /// Handle DELETE /api/recipes/:id/
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        let recipe = Self::load_modifiable(&resources, &user, &id).await?;

        if !resources.database.recipes().delete(recipe.id).await? {
            return Err(AppError::not_found("Recipe"));
        }
        resources.media.remove(&recipe.image).await;
        info!(recipe_id = recipe.id, user_id = user.id, "Recipe deleted");
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/favorite/
    async fn handle_favorite_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::add_to(&resources, &headers, &id, RecipeCollection::Favorites).await
    }

    /// Handle DELETE /api/recipes/:id/favorite/
    async fn handle_favorite_remove(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::remove_from(&resources, &headers, &id, RecipeCollection::Favorites).await
    }

    /// Handle POST /api/recipes/:id/shopping_cart/
    async fn handle_cart_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::add_to(&resources, &headers, &id, RecipeCollection::ShoppingCart).await
    }

    /// Handle DELETE /api/recipes/:id/shopping_cart/
    async fn handle_cart_remove(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::remove_from(&resources, &headers, &id, RecipeCollection::ShoppingCart).await
    }

    /// Handle GET /api/recipes/download_shopping_cart/
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        let body = shopping_cart::shopping_list(&resources.database, user.id).await?;
        Ok((
            [
                (CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\""),
                ),
            ],
            body,
        )
            .into_response())
    }

    async fn add_to(
        resources: &ServerResources,
        headers: &HeaderMap,
        id: &str,
        collection: RecipeCollection,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, headers)
            .await?;
        let recipe = Self::load_existing(resources, id).await?;

        if !resources
            .database
            .collections()
            .add(collection, user.id, recipe.id)
            .await?
        {
            return Err(AppError::already_exists(format!(
                "Recipe is already in your {collection}."
            )));
        }
        info!(recipe_id = recipe.id, user_id = user.id, %collection, "Recipe added");
        Ok((
            StatusCode::CREATED,
            Json(BriefRecipeResponse::new(recipe, &resources.media)),
        )
            .into_response())
    }

    async fn remove_from(
        resources: &ServerResources,
        headers: &HeaderMap,
        id: &str,
        collection: RecipeCollection,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, headers)
            .await?;
        let recipe = Self::load_existing(resources, id).await?;

        if !resources
            .database
            .collections()
            .remove(collection, user.id, recipe.id)
            .await?
        {
            return Err(AppError::invalid_input(format!(
                "Recipe is not in your {collection}."
            )));
        }
        info!(recipe_id = recipe.id, user_id = user.id, %collection, "Recipe removed");
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn load_existing(resources: &ServerResources, id: &str) -> AppResult<Recipe> {
        let recipe_id = parse_id(id, "Recipe")?;
        resources
            .database
            .recipes()
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))
    }

    /// The recipe, provided `user` may change it
    async fn load_modifiable(
        resources: &ServerResources,
        user: &User,
        id: &str,
    ) -> AppResult<Recipe> {
        let recipe = Self::load_existing(resources, id).await?;
        if !user.can_modify(recipe.author_id) {
            return Err(AppError::permission_denied());
        }
        Ok(recipe)
    }
}
