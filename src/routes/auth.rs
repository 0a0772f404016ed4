// ABOUTME: Token login and logout route handlers
// ABOUTME: Exchanges email and password for an opaque key and revokes presented keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Authentication routes
//!
//! Login returns a new key on every call; a user may hold several at once.
//! Logout revokes only the key used for the request.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use foodgram_core::{
    constants::messages::FIELD_REQUIRED,
    errors::{AppError, FieldErrors},
};
use serde::Deserialize;
use tracing::info;

use super::{extract::AppJson, responses::TokenResponse};
use crate::{resources::ServerResources, services::accounts};

/// Token login body
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: Option<String>,
    /// Account password
    pub password: Option<String>,
}

/// Authentication routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create token login and logout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/token/login/", post(Self::handle_login))
            .route("/api/auth/token/logout/", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle POST /api/auth/token/login/
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        AppJson(body): AppJson<LoginRequest>,
    ) -> Result<Response, AppError> {
        let mut errors = FieldErrors::new();
        if body.email.is_none() {
            errors.add("email", FIELD_REQUIRED);
        }
        if body.password.is_none() {
            errors.add("password", FIELD_REQUIRED);
        }
        let (Some(email), Some(password)) = (body.email, body.password) else {
            return Err(AppError::validation(errors));
        };

        let user =
            accounts::verify_credentials(&resources.database, &resources.auth, &email, &password)
                .await?;
        let auth_token = resources
            .auth
            .issue_token(&resources.database, user.id)
            .await?;
        info!(user_id = user.id, "User logged in");

        Ok((StatusCode::OK, Json(TokenResponse { auth_token })).into_response())
    }

    /// Handle POST /api/auth/token/logout/
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources
            .auth
            .authenticate(&resources.database, &headers)
            .await?;
        resources.auth.revoke(&resources.database, &headers).await?;
        info!(user_id = user.id, "User logged out");
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
