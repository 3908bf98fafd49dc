// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! All required values are validated once at startup so that a missing
//! credential fails the process immediately instead of at first use.

use std::env;

/// Application configuration, loaded once at startup and passed by
/// reference into the services that need it.
#[derive(Debug, Clone)]
pub struct Config {
    /// RunKeeper OAuth client ID (public)
    pub runkeeper_client_id: String,
    /// RunKeeper OAuth client secret
    pub runkeeper_client_secret: String,
    /// OAuth callback URL registered with RunKeeper
    pub runkeeper_callback_url: String,
    /// Frontend URL for post-login redirects
    pub frontend_url: String,
    /// GCP project ID for Firestore
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for signing the OAuth state parameter
    pub oauth_state_key: Vec<u8>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            runkeeper_client_id: "test_client_id".to_string(),
            runkeeper_client_secret: "test_secret".to_string(),
            runkeeper_callback_url: "http://localhost:8080/auth/runkeeper/callback".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_oauth_state_key".to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing required values produce a descriptive startup error.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            runkeeper_client_id: env::var("RUNKEEPER_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("RUNKEEPER_CLIENT_ID"))?,
            runkeeper_client_secret: env::var("RUNKEEPER_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("RUNKEEPER_CLIENT_SECRET"))?,
            runkeeper_callback_url: env::var("RUNKEEPER_CALLBACK_URL")
                .map_err(|_| ConfigError::Missing("RUNKEEPER_CALLBACK_URL"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
