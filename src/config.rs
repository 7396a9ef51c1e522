//! Environment-driven configuration.

use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const FIREBASE_API_KEY: &str = "FIREBASE_API_KEY";
    /// Identity endpoint base, including the API version segment.
    pub const FIREBASE_AUTH_URL: &str = "FIREBASE_AUTH_URL";
    /// Token-refresh endpoint base, including the API version segment.
    pub const FIREBASE_TOKEN_URL: &str = "FIREBASE_TOKEN_URL";
    pub const FIREBASE_DATABASE_URL: &str = "FIREBASE_DATABASE_URL";
    pub const IMAGE_API_BASE_URL: &str = "IMAGE_API_BASE_URL";
    pub const DOWNLOADS_DIR: &str = "STICKIES_DOWNLOADS_DIR";
    pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
    pub const EMAIL: &str = "STICKIES_EMAIL";
    pub const PASSWORD: &str = "STICKIES_PASSWORD";
}

/// Default values
pub mod defaults {
    pub const FIREBASE_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1";
    pub const FIREBASE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";
    /// Development image host running the PHP upload endpoint.
    pub const IMAGE_API_BASE_URL: &str = "http://192.168.110.105/notesapp";
    pub const DOWNLOADS_DIR: &str = "downloads";
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
}

/// Request timeout for the shared HTTP client.
pub fn http_timeout_secs() -> u64 {
    env::var(env_vars::HTTP_TIMEOUT_SECS)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults::HTTP_TIMEOUT_SECS)
}

#[derive(Clone, Debug)]
pub struct Config {
    pub firebase_api_key: String,
    pub firebase_auth_url: String,
    pub firebase_token_url: String,
    pub firebase_database_url: String,
    pub image_api_base_url: String,
    pub downloads_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            firebase_api_key: env::var(env_vars::FIREBASE_API_KEY).unwrap_or_default(),
            firebase_auth_url: env::var(env_vars::FIREBASE_AUTH_URL)
                .unwrap_or_else(|_| defaults::FIREBASE_AUTH_URL.to_string()),
            firebase_token_url: env::var(env_vars::FIREBASE_TOKEN_URL)
                .unwrap_or_else(|_| defaults::FIREBASE_TOKEN_URL.to_string()),
            firebase_database_url: env::var(env_vars::FIREBASE_DATABASE_URL).unwrap_or_default(),
            image_api_base_url: env::var(env_vars::IMAGE_API_BASE_URL)
                .unwrap_or_else(|_| defaults::IMAGE_API_BASE_URL.to_string()),
            downloads_dir: env::var(env_vars::DOWNLOADS_DIR)
                .unwrap_or_else(|_| defaults::DOWNLOADS_DIR.to_string()),
        }
    }
}
