//! Configuration types loaded from YAML

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adapters::tidebit::{timeframe_period, TidebitConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use crate::config::constants;
use crate::error::AppError;

// ============================================================================
// Defaults
// ============================================================================

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_ms() -> u64 {
    constants::http_timeout_ms()
}

fn default_timeframe() -> String {
    "1h".to_string()
}

fn default_ohlcv_limit() -> usize {
    30
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Exchange endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// What the snapshot binary fetches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchConfig {
    /// Unified symbols, e.g. "BTC/HKD"
    pub symbols: Vec<String>,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default = "default_ohlcv_limit")]
    pub ohlcv_limit: usize,
    #[serde(default)]
    pub order_book_limit: Option<u32>,
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeSettings,
    /// Exchange currency code → unified code, layered over the defaults
    #[serde(default)]
    pub currency_aliases: BTreeMap<String, String>,
    pub watch: WatchConfig,
}

impl WatchConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.symbols.is_empty() {
            return Err(AppError::Config(
                "watch.symbols must contain at least one symbol".to_string(),
            ));
        }
        for symbol in &self.symbols {
            match symbol.split_once('/') {
                Some((base, quote)) if !base.is_empty() && !quote.is_empty() => {}
                _ => {
                    return Err(AppError::Config(format!(
                        "watch.symbols: '{}' is not in BASE/QUOTE form",
                        symbol
                    )))
                }
            }
        }
        if timeframe_period(&self.timeframe).is_err() {
            return Err(AppError::Config(format!(
                "watch.timeframe: unsupported timeframe '{}'",
                self.timeframe
            )));
        }
        if self.ohlcv_limit == 0 {
            return Err(AppError::Config("watch.ohlcv_limit must be > 0".to_string()));
        }
        if self.order_book_limit == Some(0) {
            return Err(AppError::Config("watch.order_book_limit must be > 0".to_string()));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), AppError> {
        let base_url = self.exchange.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "exchange.base_url must be an http(s) URL (got '{}')",
                self.exchange.base_url
            )));
        }
        if self.exchange.api_version.trim().is_empty() {
            return Err(AppError::Config("exchange.api_version cannot be empty".to_string()));
        }
        if self.exchange.timeout_ms == 0 {
            return Err(AppError::Config("exchange.timeout_ms must be > 0".to_string()));
        }
        for (from, to) in &self.currency_aliases {
            if from.trim().is_empty() || to.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "currency_aliases: empty code in '{}' -> '{}'",
                    from, to
                )));
            }
        }
        self.watch.validate()
    }

    /// Adapter configuration: endpoint from YAML, credentials from `base`
    pub fn tidebit_config(&self, base: TidebitConfig) -> TidebitConfig {
        TidebitConfig {
            base_url: self.exchange.base_url.clone(),
            api_version: self.exchange.api_version.clone(),
            timeout_ms: self.exchange.timeout_ms,
            currency_aliases: self.currency_aliases.clone(),
            ..base
        }
    }
}
