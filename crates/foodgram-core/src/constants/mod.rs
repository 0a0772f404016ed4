// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for validation limits, defaults, and user-facing messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Field length and value bounds enforced by validation and storage
pub mod limits {
    /// Maximum length of recipe, tag, ingredient, and unit names
    pub const NAME_MAX_LENGTH: usize = 200;
    /// Maximum length of a tag slug
    pub const SLUG_MAX_LENGTH: usize = 200;
    /// Maximum length of an email address
    pub const EMAIL_MAX_LENGTH: usize = 254;
    /// Maximum length of username, first name, and last name
    pub const USER_FIELD_MAX_LENGTH: usize = 150;
    /// Minimum password length
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Smallest ingredient amount a recipe may use
    pub const MIN_AMOUNT: i64 = 1;
    /// Largest ingredient amount a recipe may use
    pub const MAX_AMOUNT: i64 = 2000;
    /// Shortest cooking time in minutes
    pub const MIN_COOKING_TIME: i64 = 1;
    /// Longest cooking time in minutes
    pub const MAX_COOKING_TIME: i64 = 360;
    /// Default page size for paginated listings
    pub const DEFAULT_PAGE_SIZE: u32 = 6;
    /// Upper bound for the `limit` query parameter
    pub const MAX_PAGE_SIZE: u32 = 100;
    /// Largest decoded image accepted for a recipe (10 MiB)
    pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
    /// Request body limit; base64 inflates images by a third
    pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024 * 1024;
    /// Length of a generated authentication token in hex characters
    pub const AUTH_TOKEN_HEX_LENGTH: usize = 40;
    /// Lowest bcrypt work factor the hasher accepts
    pub const MIN_BCRYPT_COST: u32 = 4;
    /// Highest bcrypt work factor the hasher accepts
    pub const MAX_BCRYPT_COST: u32 = 31;
}

/// Default values
pub mod defaults {
    /// Default tag color
    pub const DEFAULT_TAG_COLOR: &str = "#FF0000";
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// Default database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/foodgram.db";
    /// Default directory for uploaded media
    pub const DEFAULT_MEDIA_ROOT: &str = "./media";
    /// Public URL prefix for uploaded media
    pub const DEFAULT_MEDIA_URL: &str = "/media/";
    /// Media subdirectory holding recipe images
    pub const RECIPE_IMAGE_DIR: &str = "recipes/images";
    /// Filename offered for the shopping list download
    pub const SHOPPING_LIST_FILENAME: &str = "ingredients.txt";
    /// Service name used in logs
    pub const SERVICE_NAME: &str = "foodgram-server";
}

/// User-facing messages reused across validation paths
pub mod messages {
    /// Missing required field
    pub const FIELD_REQUIRED: &str = "This field is required.";
    /// Blank string supplied for a required field
    pub const FIELD_BLANK: &str = "This field may not be blank.";
    /// Invalid page number
    pub const INVALID_PAGE: &str = "Invalid page.";
    /// Missing credentials
    pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
    /// Unknown or revoked token
    pub const INVALID_TOKEN: &str = "Invalid token.";
    /// Authenticated but not allowed
    pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";
    /// Login failure
    pub const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";
    /// Generic not-found detail
    pub const NOT_FOUND: &str = "Not found.";
    /// Self-subscription attempt
    pub const SELF_SUBSCRIPTION: &str = "You cannot subscribe to yourself.";
    /// Generic 500 detail shown to clients
    pub const SERVER_ERROR: &str = "A server error occurred.";
}
