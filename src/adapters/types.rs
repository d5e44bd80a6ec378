//! Core data types for exchange adapters
//!
//! Normalized, exchange-agnostic representations of markets, market data,
//! orders and account state. Every entity keeps the raw exchange payload
//! under `info`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request parameters, kept sorted by key
pub type Params = BTreeMap<String, String>;

// =============================================================================
// Markets
// =============================================================================

/// Trading market as listed by the exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Market {
    /// Exchange-native market id (e.g. "btchkd")
    pub id: String,
    /// Normalized symbol (e.g. "BTC/HKD")
    pub symbol: String,
    /// Normalized base currency code
    pub base: String,
    /// Normalized quote currency code
    pub quote: String,
    /// Exchange-native base currency id
    pub base_id: String,
    /// Exchange-native quote currency id
    pub quote_id: String,
    pub info: Value,
}

/// Currency known to the market registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Currency {
    /// Exchange-native currency id
    pub id: String,
    /// Normalized currency code
    pub code: String,
}

// =============================================================================
// Market Data
// =============================================================================

/// 24h ticker snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticker {
    pub symbol: String,
    /// Unix milliseconds
    pub timestamp: Option<i64>,
    pub datetime: Option<String>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub last: Option<f64>,
    pub close: Option<f64>,
    pub base_volume: Option<f64>,
    pub info: Value,
}

/// Public trade print
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub id: String,
    /// Unix milliseconds
    pub timestamp: Option<i64>,
    pub datetime: Option<String>,
    pub symbol: String,
    pub price: Option<f64>,
    pub amount: Option<f64>,
    pub cost: Option<f64>,
    pub info: Value,
}

/// OHLCV candle: `[timestamp_ms, open, high, low, close, volume]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Candle(pub i64, pub f64, pub f64, pub f64, pub f64, pub f64);

impl Candle {
    /// Candle open time in Unix milliseconds
    pub fn timestamp(&self) -> i64 {
        self.0
    }

    pub fn open(&self) -> f64 {
        self.1
    }

    pub fn high(&self) -> f64 {
        self.2
    }

    pub fn low(&self) -> f64 {
        self.3
    }

    pub fn close(&self) -> f64 {
        self.4
    }

    pub fn volume(&self) -> f64 {
        self.5
    }
}

// =============================================================================
// Orderbook Types
// =============================================================================

/// A single level in the orderbook (price + quantity)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderbookLevel {
    /// Price at this level
    pub price: f64,
    /// Quantity available at this price
    pub quantity: f64,
}

impl OrderbookLevel {
    /// Create a new orderbook level
    pub fn new(price: f64, quantity: f64) -> Self {
        Self { price, quantity }
    }
}

/// Orderbook snapshot with bid and ask levels in exchange order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Orderbook {
    pub symbol: String,
    pub bids: Vec<OrderbookLevel>,
    pub asks: Vec<OrderbookLevel>,
    /// Timestamp in Unix milliseconds
    pub timestamp: Option<i64>,
    pub datetime: Option<String>,
}

impl Orderbook {
    /// First bid level price, as ordered by the exchange
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }

    /// First ask level price, as ordered by the exchange
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }
}

// =============================================================================
// Order Types
// =============================================================================

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "buy" => Some(OrderSide::Buy),
            "sell" => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

/// Order type (limit or market)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "limit" => Some(OrderType::Limit),
            "market" => Some(OrderType::Market),
            _ => None,
        }
    }
}

/// Normalized order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
}

/// Order as reported by the exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    /// Unix milliseconds
    pub timestamp: Option<i64>,
    pub datetime: Option<String>,
    /// None when the exchange reports a state outside the known set
    pub status: Option<OrderStatus>,
    /// None when the order's market id is not in the registry
    pub symbol: Option<String>,
    pub order_type: OrderType,
    pub side: OrderSide,
    pub price: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub filled: Option<Decimal>,
    pub remaining: Option<Decimal>,
    pub info: Value,
}

impl Order {
    /// True once the order can no longer be canceled
    pub fn is_final(&self) -> bool {
        matches!(
            self.status,
            Some(OrderStatus::Closed) | Some(OrderStatus::Canceled)
        )
    }
}

// =============================================================================
// Account Types
// =============================================================================

/// Balance of a single currency
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    pub free: Decimal,
    pub used: Decimal,
    /// Always `free + used`
    pub total: Decimal,
}

impl Balance {
    pub fn new(free: Decimal, used: Decimal) -> Self {
        Self {
            free,
            used,
            total: free + used,
        }
    }
}

/// Account balances keyed by normalized currency code
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Balances {
    pub currencies: BTreeMap<String, Balance>,
    pub info: Value,
}

impl Balances {
    pub fn get(&self, code: &str) -> Option<&Balance> {
        self.currencies.get(code)
    }
}

/// Deposit address for a currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepositAddress {
    pub currency: String,
    pub address: String,
    pub tag: Option<String>,
    pub info: Value,
}

/// Acknowledgement of a withdrawal request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalReceipt {
    /// The exchange does not return a withdrawal id
    pub id: Option<String>,
    pub info: Value,
}
