//! TideBit Adapter
//!
//! REST implementation of `ExchangeAdapter` for TideBit. Requests are
//! shaped and signed by `signing`, sent through an `HttpTransport`, and
//! responses are normalized by `types`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::shared::parse::{check_address, filter_by_since_limit, safe_string};
use crate::adapters::shared::{MarketRegistry, ReqwestTransport};
use crate::adapters::traits::{ExchangeAdapter, HttpMethod, HttpTransport};
use crate::adapters::types::{
    Balances, Candle, DepositAddress, Market, Order, OrderSide, OrderType, Orderbook, Params,
    Ticker, Trade, WithdrawalReceipt,
};

use super::config::{describe, timeframe_period, ExchangeInfo, TidebitConfig};
use super::errors::map_exchange_error;
use super::signing::{current_time_ms, sign, Api};
use super::types::{
    infer_symbol, parse_balance, parse_candle, parse_market, parse_order, parse_order_book,
    parse_ticker, parse_trade,
};

/// Candles requested when the caller gives no limit
pub const DEFAULT_OHLCV_LIMIT: usize = 30;
/// `timestamp` sent to the candle endpoint when the caller gives no `since`
pub const DEFAULT_OHLCV_SINCE: i64 = 1_800_000;

const EXCHANGE: &str = "tidebit";

fn params<const N: usize>(pairs: [(&str, String); N]) -> Params {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// TideBit exchange adapter
pub struct TidebitAdapter {
    config: TidebitConfig,
    transport: Arc<dyn HttpTransport>,
    registry: RwLock<MarketRegistry>,
}

impl TidebitAdapter {
    /// Create an adapter backed by the reqwest transport
    pub fn new(config: TidebitConfig) -> Self {
        let transport = ReqwestTransport::new(EXCHANGE, Duration::from_millis(config.timeout_ms));
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create an adapter over a caller-supplied transport
    pub fn with_transport(config: TidebitConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let registry = MarketRegistry::with_aliases(
            config
                .currency_aliases
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Self {
            config,
            transport,
            registry: RwLock::new(registry),
        }
    }

    pub fn config(&self) -> &TidebitConfig {
        &self.config
    }

    /// Static exchange metadata
    pub fn describe(&self) -> ExchangeInfo {
        describe()
    }

    /// Sign and send one request, mapping exchange error payloads
    async fn request(
        &self,
        api: Api,
        method: HttpMethod,
        path: &str,
        params: &Params,
    ) -> ExchangeResult<Value> {
        let nonce = current_time_ms();
        let request = sign(&self.config, api, method, path, params, nonce)?;
        tracing::debug!(
            exchange = EXCHANGE,
            api = ?api,
            method = method.as_str(),
            path = %path,
            "Sending request"
        );
        self.transport
            .request(request)
            .await
            .map_err(map_exchange_error)
    }

    async fn ensure_markets(&self) -> ExchangeResult<()> {
        if !self.registry.read().await.is_loaded() {
            self.load_markets(false).await?;
        }
        Ok(())
    }

    /// Market for `symbol`, loading the registry first if needed
    async fn market(&self, symbol: &str) -> ExchangeResult<Market> {
        self.ensure_markets().await?;
        self.registry.read().await.market(symbol).cloned()
    }

    async fn symbol_for_market_id(&self, market_id: Option<&str>) -> Option<String> {
        let registry = self.registry.read().await;
        market_id
            .and_then(|id| registry.market_by_id(id))
            .map(|m| m.symbol.clone())
    }

    async fn currency_id(&self, code: &str) -> ExchangeResult<String> {
        self.ensure_markets().await?;
        Ok(self.registry.read().await.currency(code)?.id.to_lowercase())
    }

    async fn order_from_response(&self, response: &Value) -> ExchangeResult<Order> {
        let market_id = safe_string(response, "market");
        let symbol = self.symbol_for_market_id(market_id.as_deref()).await;
        parse_order(response, symbol)
    }
}

fn expect_array<'a>(value: &'a Value, what: &str) -> ExchangeResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| ExchangeError::InvalidResponse(format!("{} is not an array: {}", what, value)))
}

#[async_trait]
impl ExchangeAdapter for TidebitAdapter {
    async fn fetch_markets(&self) -> ExchangeResult<Vec<Market>> {
        let response = self
            .request(Api::Public, HttpMethod::Get, "markets", &Params::new())
            .await?;
        let registry = self.registry.read().await;
        expect_array(&response, "markets")?
            .iter()
            .map(|raw| parse_market(raw, &registry))
            .collect()
    }

    async fn load_markets(&self, reload: bool) -> ExchangeResult<Vec<Market>> {
        {
            let registry = self.registry.read().await;
            if registry.is_loaded() && !reload {
                return Ok(registry.markets());
            }
        }
        let markets = self.fetch_markets().await?;
        let mut registry = self.registry.write().await;
        registry.load(markets);
        tracing::info!(
            exchange = EXCHANGE,
            event_type = "MARKETS_LOADED",
            count = registry.markets().len(),
            "Markets loaded"
        );
        Ok(registry.markets())
    }

    async fn fetch_balance(&self) -> ExchangeResult<Balances> {
        self.ensure_markets().await?;
        let response = self
            .request(Api::Private, HttpMethod::Get, "members/me", &Params::new())
            .await?;
        let accounts = response.get("accounts").ok_or_else(|| {
            ExchangeError::InvalidResponse(format!("members/me missing accounts: {}", response))
        })?;
        let registry = self.registry.read().await;
        parse_balance(accounts, &registry)
    }

    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> ExchangeResult<Orderbook> {
        let market = self.market(symbol).await?;
        let mut request = params([("market", market.id.clone())]);
        if let Some(limit) = limit {
            request.insert("limit".to_string(), limit.to_string());
        }
        let response = self
            .request(Api::Public, HttpMethod::Get, "depth", &request)
            .await?;
        parse_order_book(&response, &market.symbol)
    }

    async fn fetch_ticker(&self, symbol: &str) -> ExchangeResult<Ticker> {
        let market = self.market(symbol).await?;
        let response = self
            .request(
                Api::Public,
                HttpMethod::Get,
                "tickers/{market}",
                &params([("market", market.id.clone())]),
            )
            .await?;
        Ok(parse_ticker(&response, market.symbol))
    }

    async fn fetch_tickers(
        &self,
        symbols: Option<&[&str]>,
    ) -> ExchangeResult<BTreeMap<String, Ticker>> {
        self.ensure_markets().await?;
        let response = self
            .request(Api::Public, HttpMethod::Get, "tickers", &Params::new())
            .await?;
        let raw_tickers = response.as_object().ok_or_else(|| {
            ExchangeError::InvalidResponse(format!("tickers is not an object: {}", response))
        })?;

        let registry = self.registry.read().await;
        let mut result = BTreeMap::new();
        for (id, raw) in raw_tickers {
            let symbol = match registry.market_by_id(id) {
                Some(market) => market.symbol.clone(),
                None => infer_symbol(id, &registry),
            };
            if let Some(wanted) = symbols {
                if !wanted.contains(&symbol.as_str()) {
                    continue;
                }
            }
            result.insert(symbol.clone(), parse_ticker(raw, symbol));
        }
        Ok(result)
    }

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> ExchangeResult<Vec<Trade>> {
        let market = self.market(symbol).await?;
        let response = self
            .request(
                Api::Public,
                HttpMethod::Get,
                "trades",
                &params([("market", market.id.clone())]),
            )
            .await?;
        let mut trades = expect_array(&response, "trades")?
            .iter()
            .map(|raw| parse_trade(raw, &market.symbol))
            .collect::<ExchangeResult<Vec<_>>>()?;
        trades.sort_by_key(|t| t.timestamp);
        Ok(filter_by_since_limit(trades, since, limit, |t| t.timestamp))
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Option<i64>,
        limit: Option<usize>,
    ) -> ExchangeResult<Vec<Candle>> {
        let period = timeframe_period(timeframe)?;
        let market = self.market(symbol).await?;
        let limit = limit.unwrap_or(DEFAULT_OHLCV_LIMIT);
        let request = params([
            ("market", market.id.clone()),
            ("period", period.to_string()),
            ("limit", limit.to_string()),
            ("timestamp", since.unwrap_or(DEFAULT_OHLCV_SINCE).to_string()),
        ]);
        let response = self
            .request(Api::Public, HttpMethod::Get, "k", &request)
            .await?;

        // No candles arrives as a bare `null` body
        if response.is_null() || response.as_str() == Some("null") {
            return Ok(Vec::new());
        }
        let candles = expect_array(&response, "candles")?
            .iter()
            .map(parse_candle)
            .collect::<ExchangeResult<Vec<_>>>()?;
        Ok(filter_by_since_limit(candles, since, Some(limit), |c| {
            Some(c.timestamp())
        }))
    }

    async fn create_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> ExchangeResult<Order> {
        let market = self.market(symbol).await?;
        let mut request = params([
            ("market", market.id.clone()),
            ("side", side.as_str().to_string()),
            ("volume", amount.to_string()),
            ("ord_type", order_type.as_str().to_string()),
        ]);
        if order_type == OrderType::Limit {
            let price = price.ok_or_else(|| {
                ExchangeError::InvalidOrder("limit order requires a price".to_string())
            })?;
            request.insert("price".to_string(), price.to_string());
        }

        let response = self
            .request(Api::Private, HttpMethod::Post, "orders", &request)
            .await?;
        let order = self.order_from_response(&response).await?;
        tracing::info!(
            exchange = EXCHANGE,
            event_type = "ORDER_PLACED",
            order_id = %order.id,
            symbol = %market.symbol,
            side = side.as_str(),
            order_type = order_type.as_str(),
            amount = %amount,
            "Order placed"
        );
        Ok(order)
    }

    async fn cancel_order(&self, id: &str) -> ExchangeResult<Order> {
        self.ensure_markets().await?;
        let response = self
            .request(
                Api::Private,
                HttpMethod::Post,
                "order/delete",
                &params([("id", id.to_string())]),
            )
            .await?;
        let order = self.order_from_response(&response).await?;

        // A dead order comes back as-is instead of an error
        if order.is_final() {
            let order_json = serde_json::to_string(&order).unwrap_or_else(|_| response.to_string());
            return Err(ExchangeError::OrderNotFound(format!("{} {}", EXCHANGE, order_json)));
        }
        tracing::info!(
            exchange = EXCHANGE,
            event_type = "ORDER_CANCELED",
            order_id = %order.id,
            "Order cancel requested"
        );
        Ok(order)
    }

    async fn fetch_deposit_address(&self, code: &str) -> ExchangeResult<DepositAddress> {
        let currency_id = self.currency_id(code).await?;
        let response = self
            .request(
                Api::Private,
                HttpMethod::Get,
                "deposits/deposit_address",
                &params([("currency", currency_id)]),
            )
            .await?;

        if response.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(ExchangeError::Exchange(format!(
                "{} fetch_deposit_address() failed for {}: {}",
                EXCHANGE, code, response
            )));
        }
        let address = safe_string(&response, "address").ok_or_else(|| {
            ExchangeError::InvalidResponse(format!("deposit address missing: {}", response))
        })?;
        check_address(&address)?;
        Ok(DepositAddress {
            currency: code.to_string(),
            tag: safe_string(&response, "addressTag"),
            address,
            info: response,
        })
    }

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
        extra: &Params,
    ) -> ExchangeResult<WithdrawalReceipt> {
        check_address(address)?;
        let account_id = extra.get("id").cloned().ok_or_else(|| {
            ExchangeError::Exchange(format!(
                "{} withdraw() requires an extra id param (withdraw account id according to withdraws/bind_account_list endpoint)",
                EXCHANGE
            ))
        })?;
        let currency_id = self.currency_id(code).await?;

        let mut request = params([
            ("id", account_id),
            ("currency_type", "coin".to_string()),
            ("currency", currency_id),
            ("body", amount.to_string()),
        ]);
        if let Some(tag) = tag {
            request.insert("memo".to_string(), tag.to_string());
        }
        request.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        let response = self
            .request(Api::Private, HttpMethod::Post, "withdraws/apply", &request)
            .await?;
        tracing::info!(
            exchange = EXCHANGE,
            event_type = "WITHDRAW_REQUESTED",
            currency = %code,
            amount = %amount,
            "Withdrawal requested"
        );
        Ok(WithdrawalReceipt {
            id: None,
            info: response,
        })
    }

    fn exchange_name(&self) -> &'static str {
        EXCHANGE
    }
}

// =============================================================================
// Tests
// =============================================================================
