//! Configuration management for the Courtside server.
//!
//! Loads configuration from environment variables with sensible defaults
//! for local development.

use crate::providers::SmtpConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// MongoDB configuration
    pub mongodb: MongoConfig,
    /// Token signing configuration
    pub auth: AuthConfig,
    /// Outbound email configuration
    pub smtp: SmtpConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// MongoDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URL
    pub url: String,
    /// Database name
    pub database: String,
}

/// Token signing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for HMAC token signatures.
    ///
    /// The default is for local development only; set `TOKEN_SECRET` in any
    /// deployed environment.
    pub token_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a local-development default, so a bare `from_env()`
    /// yields a config that runs against `mongodb://localhost:27017`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
            },
            mongodb: MongoConfig {
                url: env::var("MONGODB_URL")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| "courtside".to_string()),
            },
            auth: AuthConfig {
                token_secret: env::var("TOKEN_SECRET")
                    .unwrap_or_else(|_| "courtside-dev-secret-change-me".to_string()),
            },
            smtp: SmtpConfig {
                server: env::var("SMTP_SERVER").unwrap_or_else(|_| "localhost".to_string()),
                port: env::var("SMTP_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(587),
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from_email: env::var("SMTP_FROM_EMAIL")
                    .unwrap_or_else(|_| "no-reply@courtside.local".to_string()),
                from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Courtside".to_string()),
                base_url: env::var("PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            },
        }
    }

    /// Socket address string for the HTTP listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
