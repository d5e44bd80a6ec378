//! Application-wide constants and configuration defaults
//!
//! Values can be overridden via environment variables.

use std::time::Duration;

// =============================================================================
// HTTP Configuration
// =============================================================================

/// REST request timeout in milliseconds (default: 10000ms)
///
/// Environment variable: `HTTP_TIMEOUT_MS`
pub fn http_timeout_ms() -> u64 {
    std::env::var("HTTP_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10_000)
}

/// TCP connect timeout (default: 5000ms)
///
/// Environment variable: `HTTP_CONNECT_TIMEOUT_MS`
pub fn http_connect_timeout() -> Duration {
    let ms = std::env::var("HTTP_CONNECT_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5_000);
    Duration::from_millis(ms)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Log the effective configuration values at startup
pub fn log_configuration() {
    tracing::info!(
        phase = "init",
        http_timeout_ms = http_timeout_ms(),
        http_connect_timeout_ms = http_connect_timeout().as_millis() as u64,
        "Application configuration"
    );
}
