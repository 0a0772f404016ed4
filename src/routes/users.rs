// ABOUTME: User account, password, and subscription route handlers
// ABOUTME: Registration, profiles, set_password, and follow/unfollow of authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! User routes
//!
//! Listing and registration are open to anonymous clients; everything else
//! requires a token. The current user's profile is read-only over the API.

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use foodgram_core::{
    constants::messages::SELF_SUBSCRIPTION,
    errors::AppError,
    models::UserRole,
};
use serde::Deserialize;
use tracing::info;

use super::{
    extract::{page_request, paginate, parse_id, parse_u32, AppJson},
    responses::{RegisteredUserResponse, SubscriptionResponse, UserResponse},
};
use crate::{
    resources::ServerResources,
    services::{
        accounts::{self, RegistrationPayload, SetPasswordPayload},
        authors,
    },
};

/// `page` and `limit` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
}

/// Subscription listing parameters
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionsQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// Maximum recipes shown per author
    pub recipes_limit: Option<String>,
}

/// User routes implementation
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user and subscription routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/",
                get(Self::handle_list).post(Self::handle_register),
            )
            .route(
                "/api/users/me/",
                get(Self::handle_me)
                    .put(Self::handle_me_forbidden)
                    .patch(Self::handle_me_forbidden)
                    .delete(Self::handle_me_forbidden),
            )
            .route("/api/users/set_password/", post(Self::handle_set_password))
            .route("/api/users/subscriptions/", get(Self::handle_subscriptions))
            .route("/api/users/:id/", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe/",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    /// Handle GET /api/users/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        Query(query): Query<PageQuery>,
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

        let users = resources.database.users();
        let count = users.count().await?;
        let results = users.list(&page).await?;

        let ids: Vec<i64> = results.iter().map(|u| u.id).collect();
        let following = match &viewer {
            Some(viewer) => {
                resources
                    .database
                    .subscriptions()
                    .followed_among(viewer.id, &ids)
                    .await?
            }
            None => HashSet::new(),
        };

        let results = results
            .into_iter()
            .map(|user| {
                let is_subscribed = following.contains(&user.id);
                UserResponse::new(user, is_subscribed)
            })
            .collect();
        Ok(Json(paginate(&uri, &page, count, results)?).into_response())
    }

    /// Handle POST /api/users/
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        AppJson(body): AppJson<RegistrationPayload>,
    ) -> Result<Response, AppError> {
        let user =
            accounts::register(&resources.database, &resources.auth, body, UserRole::User).await?;
        let response: RegisteredUserResponse = user.into();
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/users/me/
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        Ok(Json(UserResponse::new(user, false)).into_response())
    }

    /// Handle PUT/PATCH/DELETE /api/users/me/
    async fn handle_me_forbidden(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        Err(AppError::permission_denied())
    }

    /// Handle GET /api/users/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let viewer = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        let user_id = parse_id(&id, "User")?;
        let user = resources
            .database
            .users()
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let is_subscribed = resources
            .database
            .subscriptions()
            .followed_among(viewer.id, &[user.id])
            .await?
            .contains(&user.id);
        Ok(Json(UserResponse::new(user, is_subscribed)).into_response())
    }

    /// Handle POST /api/users/set_password/
    async fn handle_set_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        AppJson(body): AppJson<SetPasswordPayload>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        accounts::change_password(&resources.database, &resources.auth, &user, body).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/users/subscriptions/
    async fn handle_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        uri: Uri,
        Query(query): Query<SubscriptionsQuery>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        let page = page_request(
            query.page.as_deref(),
            query.limit.as_deref(),
            &resources.config.pagination,
        )?;

        let subscriptions = resources.database.subscriptions();
        let count = subscriptions.count(user.id).await?;
        let followed = subscriptions.list_authors(user.id, &page).await?;
        let summaries = authors::load_summaries(
            &resources.database,
            Some(&user),
            followed,
            parse_u32(query.recipes_limit.as_deref()),
        )
        .await?;

        let results = summaries
            .into_iter()
            .map(|summary| SubscriptionResponse::new(summary, &resources.media))
            .collect();
        Ok(Json(paginate(&uri, &page, count, results)?).into_response())
    }

    /// Handle POST /api/users/:id/subscribe/
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Query(query): Query<SubscriptionsQuery>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        let author_id = parse_id(&id, "User")?;
        let author = resources
            .database
            .users()
            .get(author_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if author.id == user.id {
            return Err(AppError::invalid_input(SELF_SUBSCRIPTION));
        }
        if !resources
            .database
            .subscriptions()
            .add(user.id, author.id)
            .await?
        {
            return Err(AppError::already_exists(
                "You are already subscribed to this author.",
            ));
        }
        info!(user_id = user.id, author_id = author.id, "Subscribed");

        let summary = authors::load_summaries(
            &resources.database,
            Some(&user),
            vec![author],
            parse_u32(query.recipes_limit.as_deref()),
        )
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("Subscription summary missing"))?;
        Ok((
            StatusCode::CREATED,
            Json(SubscriptionResponse::new(summary, &resources.media)),
        )
            .into_response())
    }

    /// Handle DELETE /api/users/:id/subscribe/
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        let author_id = parse_id(&id, "User")?;
        if resources.database.users().get(author_id).await?.is_none() {
            return Err(AppError::not_found("User"));
        }

        if !resources
            .database
            .subscriptions()
            .remove(user.id, author_id)
            .await?
        {
            return Err(AppError::invalid_input(
                "You are not subscribed to this author.",
            ));
        }
        info!(user_id = user.id, author_id, "Unsubscribed");
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
