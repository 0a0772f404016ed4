// ABOUTME: HTTP tests for liveness, readiness, and request-id propagation
// ABOUTME: Runs against the full router so middleware layers are exercised
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::create_test_app;
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

#[tokio::test]
async fn test_health_reports_service() {
    let app = create_test_app().await;

    let body: Value = AxumTestRequest::get("/health")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ready_checks_database() {
    let app = create_test_app().await;

    let body: Value = AxumTestRequest::get("/ready")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let app = create_test_app().await;

    let generated = AxumTestRequest::get("/health").send(app.router()).await;
    assert!(generated.header("x-request-id").is_some());

    let echoed = AxumTestRequest::get("/health")
        .header("x-request-id", "probe-17")
        .send(app.router())
        .await;
    assert_eq!(echoed.header("x-request-id"), Some("probe-17"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app().await;
    AxumTestRequest::get("/api/nothing-here/")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
