// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Environment-based configuration management for production deployment

use std::{
    env,
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use anyhow::{Context, Result};
use foodgram_core::constants::{defaults, limits};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Environment type for logging and other deployment-specific behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlx` connection string, e.g. `sqlite:./data/foodgram.db`
    pub url: String,
    /// Pool size for file-backed databases
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Whether the URL points at an in-memory database
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Uploaded media settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory where uploads are written
    pub root: PathBuf,
    /// Public URL prefix, always with leading and trailing slash
    pub url: String,
}

/// Cross-origin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// `*` or a comma-separated list of origins
    pub allowed_origins: String,
}

/// Pagination settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Default page size
    pub page_size: u32,
    /// Upper bound for the `limit` parameter
    pub max_page_size: u32,
}

/// Authentication settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthConfig {
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database settings
    pub database: DatabaseConfig,
    /// Media settings
    pub media: MediaConfig,
    /// CORS settings
    pub cors: CorsConfig,
    /// Pagination settings
    pub pagination: PaginationConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed or validation fails
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            host: env_var_or("HOST", defaults::DEFAULT_HOST),
            http_port: env_var_or("HTTP_PORT", &defaults::DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database: DatabaseConfig {
                url: env_var_or("DATABASE_URL", defaults::DEFAULT_DATABASE_URL),
                max_connections: env_var_or("DATABASE_MAX_CONNECTIONS", "10")
                    .parse()
                    .context("Invalid DATABASE_MAX_CONNECTIONS value")?,
            },
            media: MediaConfig {
                root: PathBuf::from(env_var_or("MEDIA_ROOT", defaults::DEFAULT_MEDIA_ROOT)),
                url: normalize_url_prefix(&env_var_or("MEDIA_URL", defaults::DEFAULT_MEDIA_URL)),
            },
            cors: CorsConfig {
                allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
            },
            pagination: PaginationConfig {
                page_size: env_var_or("PAGE_SIZE", &limits::DEFAULT_PAGE_SIZE.to_string())
                    .parse()
                    .context("Invalid PAGE_SIZE value")?,
                max_page_size: env_var_or("MAX_PAGE_SIZE", &limits::MAX_PAGE_SIZE.to_string())
                    .parse()
                    .context("Invalid MAX_PAGE_SIZE value")?,
            },
            auth: AuthConfig {
                bcrypt_cost: env_var_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())
                    .parse()
                    .context("Invalid BCRYPT_COST value")?,
            },
            request_timeout_secs: env_var_or("REQUEST_TIMEOUT_SECS", "30")
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECS value")?,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Configuration for tests: in-memory database, cheap hashing, given media root
    #[must_use]
    pub fn for_testing(media_root: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            http_port: 0,
            environment: Environment::Testing,
            database: DatabaseConfig {
                url: "sqlite::memory:".to_owned(),
                max_connections: 1,
            },
            media: MediaConfig {
                root: media_root,
                url: defaults::DEFAULT_MEDIA_URL.to_owned(),
            },
            cors: CorsConfig {
                allowed_origins: "*".to_owned(),
            },
            pagination: PaginationConfig {
                page_size: limits::DEFAULT_PAGE_SIZE,
                max_page_size: limits::MAX_PAGE_SIZE,
            },
            auth: AuthConfig {
                bcrypt_cost: limits::MIN_BCRYPT_COST,
            },
            request_timeout_secs: 30,
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when a value is outside its accepted range
    pub fn validate(&self) -> Result<()> {
        if self.pagination.page_size == 0 {
            return Err(anyhow::anyhow!("PAGE_SIZE must be greater than zero"));
        }
        if self.pagination.max_page_size < self.pagination.page_size {
            return Err(anyhow::anyhow!(
                "MAX_PAGE_SIZE must not be smaller than PAGE_SIZE"
            ));
        }
        let cost_range = limits::MIN_BCRYPT_COST..=limits::MAX_BCRYPT_COST;
        if !cost_range.contains(&self.auth.bcrypt_cost) {
            return Err(anyhow::anyhow!(
                "BCRYPT_COST must be between {} and {}",
                limits::MIN_BCRYPT_COST,
                limits::MAX_BCRYPT_COST
            ));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!(
                "DATABASE_MAX_CONNECTIONS must be greater than zero"
            ));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Foodgram Server Configuration:\n\
             - Address: {}:{}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Media: {} -> {}\n\
             - CORS Origins: {}\n\
             - Page Size: {} (max {})",
            self.host,
            self.http_port,
            self.environment,
            self.database.url,
            self.media.url,
            self.media.root.display(),
            self.cors.allowed_origins,
            self.pagination.page_size,
            self.pagination.max_page_size,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Ensure a URL prefix starts and ends with `/`
fn normalize_url_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("anything"),
            Environment::Development
        );
    }

    #[test]
    fn test_normalize_url_prefix() {
        assert_eq!(normalize_url_prefix("media"), "/media/");
        assert_eq!(normalize_url_prefix("/static/media/"), "/static/media/");
        assert_eq!(normalize_url_prefix(""), "/");
    }

    #[test]
    fn test_validation_rejects_inverted_page_sizes() {
        let mut config = ServerConfig::for_testing(PathBuf::from("/tmp"));
        assert!(config.validate().is_ok());
        config.pagination.max_page_size = 2;
        config.pagination.page_size = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_bcrypt_cost() {
        let mut config = ServerConfig::for_testing(PathBuf::from("/tmp"));
        assert_eq!(config.auth.bcrypt_cost, limits::MIN_BCRYPT_COST);
        config.auth.bcrypt_cost = limits::MAX_BCRYPT_COST;
        assert!(config.validate().is_ok());
        config.auth.bcrypt_cost = limits::MIN_BCRYPT_COST - 1;
        assert!(config.validate().is_err());
        config.auth.bcrypt_cost = limits::MAX_BCRYPT_COST + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_database_detection() {
        let config = ServerConfig::for_testing(PathBuf::from("/tmp"));
        assert!(config.database.is_memory());
    }
}
