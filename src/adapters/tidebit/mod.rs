//! TideBit Exchange Adapter
//!
//! Implements the ExchangeAdapter trait for TideBit's REST API (v2).
//! Private endpoints are authenticated with an access key, a millisecond
//! `tonce` and an HMAC-SHA256 signature.
//!
//! This module is organized into submodules:
//! - `config` - Configuration, environment loading and exchange metadata
//! - `signing` - Request shaping and HMAC signing
//! - `errors` - Exchange error payload mapping
//! - `types` - Raw payload parsing into unified types
//! - `adapter` - Main TidebitAdapter implementation

mod adapter;
mod config;
mod errors;
mod signing;
mod types;

// Re-export public items
pub use adapter::{TidebitAdapter, DEFAULT_OHLCV_LIMIT, DEFAULT_OHLCV_SINCE};
pub use config::{
    describe, timeframe_period, Capabilities, ExchangeInfo, TidebitConfig, TradingFees,
    DEFAULT_API_VERSION, DEFAULT_BASE_URL, TIMEFRAMES,
};
pub use errors::{map_exchange_error, ErrorCodeKind, ERROR_CODES};
pub use signing::{current_time_ms, hmac_sha256_hex, sign, Api};
pub use types::parse_order_status;
