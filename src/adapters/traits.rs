//! Exchange adapter trait definitions
//!
//! `ExchangeAdapter` is the unified trading interface every exchange
//! implementation exposes. `HttpTransport` is the seam between an adapter
//! and the network.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::types::{
    Balances, Candle, DepositAddress, Market, Order, OrderSide, OrderType, Orderbook, Params,
    Ticker, Trade, WithdrawalReceipt,
};

// =============================================================================
// HTTP Transport
// =============================================================================

/// HTTP verbs used by REST adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Fully shaped request, ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Issues HTTP requests and returns the parsed JSON body
///
/// Implementations return `ExchangeError::HttpStatus` for non-2xx
/// responses and `ConnectionFailed`/`NetworkTimeout` for network failures.
/// A body that is not valid JSON is returned as `Value::String`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn request(&self, request: HttpRequest) -> ExchangeResult<Value>;
}

// =============================================================================
// Exchange Adapter
// =============================================================================

/// Common trait for all exchange adapters
///
/// Symbols are normalized "BASE/QUOTE" strings. Operations that need symbol
/// resolution load the market registry on first use.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// Fetch the market list from the exchange without touching the registry
    async fn fetch_markets(&self) -> ExchangeResult<Vec<Market>>;

    /// Populate the market registry, refetching when `reload` is set
    async fn load_markets(&self, reload: bool) -> ExchangeResult<Vec<Market>>;

    /// Account balances keyed by normalized currency code
    async fn fetch_balance(&self) -> ExchangeResult<Balances>;

    /// Orderbook snapshot; `limit` is only sent when supplied
    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>)
        -> ExchangeResult<Orderbook>;

    async fn fetch_ticker(&self, symbol: &str) -> ExchangeResult<Ticker>;

    /// Tickers keyed by symbol, optionally restricted to `symbols`
    async fn fetch_tickers(
        &self,
        symbols: Option<&[&str]>,
    ) -> ExchangeResult<BTreeMap<String, Ticker>>;

    /// Recent trades, filtered client-side by `since` (ms) and `limit`
    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> ExchangeResult<Vec<Trade>>;

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> ExchangeResult<Vec<Candle>>;

    /// Place an order; `price` is required for limit orders and ignored for market orders
    async fn create_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> ExchangeResult<Order>;

    /// Cancel an open order and return its updated state
    async fn cancel_order(&self, id: &str) -> ExchangeResult<Order>;

    async fn fetch_deposit_address(&self, code: &str) -> ExchangeResult<DepositAddress>;

    /// Request a withdrawal; exchange-specific fields travel in `params`
    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
        params: &Params,
    ) -> ExchangeResult<WithdrawalReceipt>;

    /// Get the exchange name identifier
    fn exchange_name(&self) -> &'static str;
}
