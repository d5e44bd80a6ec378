//! TideBit Configuration
//!
//! Endpoint, credentials and static exchange metadata (capabilities, fees,
//! timeframe table).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::config::constants;

/// Production REST host
pub const DEFAULT_BASE_URL: &str = "https://www.tidebit.com";
/// REST API version segment
pub const DEFAULT_API_VERSION: &str = "v2";

/// Candle timeframe → exchange period code (minutes)
pub const TIMEFRAMES: &[(&str, &str)] = &[
    ("1m", "1"),
    ("5m", "5"),
    ("15m", "15"),
    ("30m", "30"),
    ("1h", "60"),
    ("2h", "120"),
    ("4h", "240"),
    ("12h", "720"),
    ("1d", "1440"),
    ("3d", "4320"),
    ("1w", "10080"),
];

/// Exchange period code for a timeframe string
pub fn timeframe_period(timeframe: &str) -> ExchangeResult<&'static str> {
    TIMEFRAMES
        .iter()
        .find(|(tf, _)| *tf == timeframe)
        .map(|(_, period)| *period)
        .ok_or_else(|| ExchangeError::UnsupportedTimeframe(timeframe.to_string()))
}

// =============================================================================
// Exchange Metadata
// =============================================================================

/// Operations the adapter supports beyond the always-available set
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Capabilities {
    pub cors: bool,
    pub fetch_deposit_address: bool,
    pub fetch_tickers: bool,
    pub fetch_ohlcv: bool,
    pub withdraw: bool,
}

/// Trading fee schedule
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TradingFees {
    pub tier_based: bool,
    pub percentage: bool,
    pub maker: f64,
    pub taker: f64,
}

/// Static description of the exchange
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExchangeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub countries: &'static [&'static str],
    /// Minimum spacing between requests advertised by the exchange
    pub rate_limit_ms: u64,
    pub version: &'static str,
    pub api_url: &'static str,
    pub www_url: &'static str,
    pub doc_urls: &'static [&'static str],
    pub has: Capabilities,
    pub fees: TradingFees,
    pub timeframes: &'static [(&'static str, &'static str)],
}

/// Describe the TideBit exchange
pub fn describe() -> ExchangeInfo {
    ExchangeInfo {
        id: "tidebit",
        name: "TideBit",
        countries: &["HK"],
        rate_limit_ms: 1000,
        version: DEFAULT_API_VERSION,
        api_url: DEFAULT_BASE_URL,
        www_url: DEFAULT_BASE_URL,
        doc_urls: &[
            "https://www.tidebit.com/documents/api/guide",
            "https://www.tidebit.com/swagger/#/default",
        ],
        has: Capabilities {
            cors: true,
            fetch_deposit_address: true,
            fetch_tickers: true,
            fetch_ohlcv: true,
            withdraw: true,
        },
        fees: TradingFees {
            tier_based: false,
            percentage: true,
            maker: 0.2 / 100.0,
            taker: 0.2 / 100.0,
        },
        timeframes: TIMEFRAMES,
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for TideBit REST access
#[derive(Clone)]
pub struct TidebitConfig {
    /// API access key; private calls fail without it
    pub api_key: Option<String>,
    /// API secret used for HMAC signing
    pub secret: Option<String>,
    pub base_url: String,
    pub api_version: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Extra currency aliases layered over the defaults
    pub currency_aliases: BTreeMap<String, String>,
}

impl TidebitConfig {
    /// Create configuration from environment variables
    ///
    /// Credentials are optional: `TIDEBIT_API_KEY` / `TIDEBIT_SECRET`.
    /// `TIDEBIT_BASE_URL` and `TIDEBIT_API_VERSION` override the endpoint.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty("TIDEBIT_API_KEY"),
            secret: non_empty("TIDEBIT_SECRET"),
            base_url: non_empty("TIDEBIT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_version: non_empty("TIDEBIT_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            ..Default::default()
        }
    }

    /// Set API credentials
    pub fn with_credentials(mut self, api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self.secret = Some(secret.into());
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    /// API key and secret, or `AuthenticationFailed` when either is missing
    pub fn credentials(&self) -> ExchangeResult<(&str, &str)> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ExchangeError::AuthenticationFailed("tidebit requires \"apiKey\"".into()))?;
        let secret = self
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ExchangeError::AuthenticationFailed("tidebit requires \"secret\"".into()))?;
        Ok((api_key, secret))
    }

    /// Base URL without trailing slash
    pub fn rest_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for TidebitConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            secret: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_ms: constants::http_timeout_ms(),
            currency_aliases: BTreeMap::new(),
        }
    }
}

impl std::fmt::Debug for TidebitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TidebitConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout_ms", &self.timeout_ms)
            .field("currency_aliases", &self.currency_aliases)
            .finish()
    }
}
