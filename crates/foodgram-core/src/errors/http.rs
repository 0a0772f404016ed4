// ABOUTME: Axum response conversion for AppError
// ABOUTME: Logs server-side failures and renders the client-facing JSON body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use tracing::{debug, error};

use super::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error.code = ?self.code, error.message = %self.message, "Request failed");
        } else {
            debug!(error.code = ?self.code, error.message = %self.message, "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}
