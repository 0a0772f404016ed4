// ABOUTME: HTTP server assembly and lifecycle for the Foodgram API
// ABOUTME: Merges domain routers, applies middleware, serves media, and shuts down gracefully
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, http::StatusCode, Router};
use foodgram_core::constants::limits::MAX_REQUEST_BODY_BYTES;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, timeout::TimeoutLayer};
use tracing::info;

use crate::{
    middleware::{propagate_request_id_layer, set_request_id_layer, setup_cors, trace_layer},
    resources::ServerResources,
    routes::{
        AuthRoutes, HealthRoutes, IngredientRoutes, RecipeRoutes, TagRoutes, UserRoutes,
    },
};

/// The Foodgram HTTP server
pub struct FoodgramServer {
    resources: Arc<ServerResources>,
}

impl FoodgramServer {
    /// Create a server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Complete application router with middleware
    pub fn router(&self) -> Router {
        build_router(&self.resources)
    }

    /// Bind to the configured host and `port` and serve until SIGINT or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails
    pub async fn run(self, port: u16) -> Result<()> {
        let address = format!("{}:{port}", self.resources.config.host);
        let app = self.router();

        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        info!("Server listening on {address}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        info!("Server stopped");
        Ok(())
    }
}

/// Merge all domain routers and wrap them in the shared middleware stack
///
/// Layers run outermost first on requests: CORS, request id assignment,
/// request id propagation, timeout, then the tracing span.
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let config = &resources.config;

    let mut router = Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .merge(UserRoutes::routes(Arc::clone(resources)))
        .merge(TagRoutes::routes(Arc::clone(resources)))
        .merge(IngredientRoutes::routes(Arc::clone(resources)))
        .merge(RecipeRoutes::routes(Arc::clone(resources)));

    // Uploaded images are served locally only when MEDIA_URL is a path
    let media_path = config.media.url.trim_end_matches('/');
    if media_path.starts_with('/') && media_path.len() > 1 {
        router = router.nest_service(media_path, ServeDir::new(resources.media.root()));
    }

    router
        .layer(trace_layer())
        .layer(request_timeout_layer(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
        .layer(setup_cors(config))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
}

/// Requests running longer than `timeout` get 408
fn request_timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .route("/fast", get(|| async { "done" }))
            .layer(request_timeout_layer(Duration::from_millis(20)));

        let slow = router
            .clone()
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(slow.status(), StatusCode::REQUEST_TIMEOUT);

        let fast = router
            .oneshot(Request::get("/fast").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(fast.status(), StatusCode::OK);
    }
}
