//! Shared HTTP client.

use once_cell::sync::Lazy;
use std::time::Duration;

static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(crate::config::http_timeout_secs()))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("[Http] Failed to build configured client, using defaults: {}", e);
            reqwest::Client::new()
        })
});

/// Process-wide reqwest client with the configured request timeout.
pub fn shared_client() -> &'static reqwest::Client {
    &CLIENT
}
