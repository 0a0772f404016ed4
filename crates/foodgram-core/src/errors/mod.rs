// ABOUTME: Unified error handling with standard error codes and per-field validation errors
// ABOUTME: Maps every failure to an HTTP status and a client-facing JSON body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Unified Error Handling System
//!
//! A single [`AppError`] type flows from storage through services to HTTP
//! handlers. Each error carries an [`ErrorCode`] that decides the HTTP status,
//! a human-readable message, and optionally a set of per-field validation
//! messages.
//!
//! Client-facing bodies take one of three shapes:
//!
//! - `{"field": ["message", ...]}` when field errors are present
//! - `{"errors": "message"}` for other 400 responses (e.g. duplicate toggles)
//! - `{"detail": "message"}` for everything else

mod fields;
#[cfg(feature = "http-response")]
mod http;

pub use fields::{FieldErrors, NON_FIELD_ERRORS};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::constants::messages;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication & Authorization
    /// No credentials were supplied
    AuthRequired,
    /// Credentials were supplied but are not valid
    AuthInvalid,
    /// Authenticated, but the action is not permitted
    PermissionDenied,

    // Validation
    /// Generic invalid request
    InvalidInput,
    /// One or more fields failed validation
    ValidationFailed,
    /// The relation being added already exists (favorite, cart, subscription)
    AlreadyExists,

    // Resources
    /// Requested resource does not exist
    ResourceNotFound,

    // Internal
    /// Unexpected server-side failure
    InternalError,
    /// Database operation failed
    DatabaseError,
    /// Media storage failed
    StorageError,
    /// Serialization or deserialization failed
    SerializationError,
    /// Invalid or missing configuration
    ConfigError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::ValidationFailed | Self::AlreadyExists => 400,
            Self::AuthRequired | Self::AuthInvalid => 401,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::InternalError
            | Self::DatabaseError
            | Self::StorageError
            | Self::SerializationError
            | Self::ConfigError => 500,
        }
    }

    /// Get a short description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::ValidationFailed => "One or more fields failed validation",
            Self::AlreadyExists => "The entry already exists",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::ConfigError => "Configuration error encountered",
        }
    }

    /// Whether this code represents a server-side failure
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }
}

/// Unified error type for the application
#[derive(Debug, Clone, Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation messages (empty unless `ValidationFailed`)
    pub field_errors: FieldErrors,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: FieldErrors::new(),
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, messages::NOT_AUTHENTICATED)
    }

    /// Invalid authentication
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authenticated user may not perform the action
    #[must_use]
    pub fn permission_denied() -> Self {
        Self::new(ErrorCode::PermissionDenied, messages::PERMISSION_DENIED)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found.", resource.into()),
        )
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Relation already present (duplicate favorite, cart entry, or subscription)
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyExists, message)
    }

    /// Validation failure carrying per-field messages
    #[must_use]
    pub fn validation(field_errors: FieldErrors) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: field_errors.summary(),
            field_errors,
        }
    }

    /// Validation failure for a single field
    #[must_use]
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::validation(errors)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Media storage error
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Client-facing JSON body for this error
    ///
    /// Server-side failures never leak their internal message.
    #[must_use]
    pub fn body(&self) -> Value {
        if !self.field_errors.is_empty() {
            return self.field_errors.to_json();
        }
        match self.code {
            ErrorCode::InvalidInput | ErrorCode::ValidationFailed | ErrorCode::AlreadyExists => {
                json!({ "errors": self.message })
            }
            code if code.is_server_error() => json!({ "detail": messages::SERVER_ERROR }),
            _ => json!({ "detail": self.message }),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::SerializationError,
            format!("JSON processing failed: {error}"),
        )
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::not_found("Row"),
            other => Self::database(format!("Database operation failed: {other}")),
        }
    }
}
