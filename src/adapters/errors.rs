//! Exchange adapter error types
//!
//! All exchange-related errors are wrapped in ExchangeError enum
//! which implements thiserror for consistent error handling.

use thiserror::Error;

/// Exchange-specific error types for adapter operations
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Credentials missing or rejected before a private call
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Exchange reported the account cannot cover the request
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Order does not exist or is no longer open
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Order parameters rejected locally before sending
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Funding address failed format validation
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Symbol or market id not present in the market registry
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Timeframe missing from the exchange's period table
    #[error("Unsupported timeframe: {0}")]
    UnsupportedTimeframe(String),

    /// Generic exchange-semantic error (unmapped codes, unsupported requests)
    #[error("Exchange error: {0}")]
    Exchange(String),

    /// Invalid or unexpected response from exchange
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Non-2xx HTTP status returned by the transport
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Connection to exchange failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Network operation timed out
    #[error("Network timeout after {0}ms")]
    NetworkTimeout(u64),
}

impl ExchangeError {
    /// True for errors raised by the transport rather than by the exchange
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ExchangeError::HttpStatus { .. }
                | ExchangeError::ConnectionFailed(_)
                | ExchangeError::NetworkTimeout(_)
        )
    }
}

/// Result type alias for exchange operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display() {
        let err = ExchangeError::ConnectionFailed("timeout".to_string());
        assert_eq!(err.to_string(), "Connection failed: timeout");
    }

    #[test]
    fn test_network_timeout_display() {
        let err = ExchangeError::NetworkTimeout(5000);
        assert_eq!(err.to_string(), "Network timeout after 5000ms");
    }

    #[test]
    fn test_http_status_display() {
        let err = ExchangeError::HttpStatus {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_order_not_found_display() {
        let err = ExchangeError::OrderNotFound("tidebit {\"id\":\"5\"}".to_string());
        assert_eq!(err.to_string(), "Order not found: tidebit {\"id\":\"5\"}");
    }

    #[test]
    fn test_is_transport() {
        assert!(ExchangeError::NetworkTimeout(10).is_transport());
        assert!(ExchangeError::HttpStatus { status: 500, body: String::new() }.is_transport());
        assert!(!ExchangeError::InsufficientFunds("x".into()).is_transport());
        assert!(!ExchangeError::Exchange("x".into()).is_transport());
    }
}
