//! TideBit Types
//!
//! Conversion of raw TideBit payloads into the normalized data model.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::shared::parse::{
    iso8601, parse8601, safe_decimal, safe_f64, safe_seconds_as_ms, safe_string, value_to_f64,
    value_to_i64,
};
use crate::adapters::shared::MarketRegistry;
use crate::adapters::types::{
    Balance, Balances, Candle, Market, Order, OrderSide, OrderStatus, OrderType, Orderbook,
    OrderbookLevel, Ticker, Trade,
};

fn required_string(raw: &Value, key: &str, what: &str) -> ExchangeResult<String> {
    safe_string(raw, key).ok_or_else(|| {
        ExchangeError::InvalidResponse(format!("{} missing \"{}\": {}", what, key, raw))
    })
}

// =============================================================================
// Markets
// =============================================================================

/// Market from a `markets` entry (`{"id": "btchkd", "name": "BTC/HKD"}`)
pub(crate) fn parse_market(raw: &Value, registry: &MarketRegistry) -> ExchangeResult<Market> {
    let id = required_string(raw, "id", "market")?;
    let symbol = required_string(raw, "name", "market")?;
    let (base_id, quote_id) = symbol.split_once('/').ok_or_else(|| {
        ExchangeError::InvalidResponse(format!("market name is not BASE/QUOTE: {}", symbol))
    })?;
    Ok(Market {
        id,
        base: registry.currency_alias(base_id),
        quote: registry.currency_alias(quote_id),
        base_id: base_id.to_string(),
        quote_id: quote_id.to_string(),
        symbol,
        info: raw.clone(),
    })
}

/// Symbol for a ticker id with no registered market
///
/// Assumes a 3+3 character id ("btchkd" → "BTC/HKD"); other lengths yield a
/// wrong symbol.
pub(crate) fn infer_symbol(id: &str, registry: &MarketRegistry) -> String {
    if id.chars().count() != 6 {
        tracing::warn!(
            exchange = "tidebit",
            market_id = %id,
            "Ticker id is not 6 characters, inferred symbol may be wrong"
        );
    }
    let base: String = id.chars().take(3).collect::<String>().to_uppercase();
    let quote: String = id.chars().skip(3).take(3).collect::<String>().to_uppercase();
    format!(
        "{}/{}",
        registry.currency_alias(&base),
        registry.currency_alias(&quote)
    )
}

// =============================================================================
// Market Data
// =============================================================================

/// Ticker from `{"at": <secs>, "ticker": {buy, sell, low, high, last, vol}}`
///
/// `info` holds the inner `ticker` object.
pub(crate) fn parse_ticker(raw: &Value, symbol: String) -> Ticker {
    let timestamp = safe_seconds_as_ms(raw, "at");
    let ticker = raw.get("ticker").unwrap_or(&Value::Null);
    let last = safe_f64(ticker, "last");
    Ticker {
        symbol,
        timestamp,
        datetime: timestamp.and_then(iso8601),
        high: safe_f64(ticker, "high"),
        low: safe_f64(ticker, "low"),
        bid: safe_f64(ticker, "buy"),
        ask: safe_f64(ticker, "sell"),
        last,
        close: last,
        base_volume: safe_f64(ticker, "vol"),
        info: ticker.clone(),
    }
}

/// Trade from `{"id", "price", "volume", "funds", "created_at"}`
pub(crate) fn parse_trade(raw: &Value, symbol: &str) -> ExchangeResult<Trade> {
    let id = required_string(raw, "id", "trade")?;
    let timestamp = safe_string(raw, "created_at").and_then(|s| parse8601(&s));
    Ok(Trade {
        id,
        timestamp,
        datetime: timestamp.and_then(iso8601),
        symbol: symbol.to_string(),
        price: safe_f64(raw, "price"),
        amount: safe_f64(raw, "volume"),
        cost: safe_f64(raw, "funds"),
        info: raw.clone(),
    })
}

/// Candle from `[secs, open, high, low, close, volume]`
pub(crate) fn parse_candle(raw: &Value) -> ExchangeResult<Candle> {
    let invalid = || ExchangeError::InvalidResponse(format!("malformed candle: {}", raw));
    let values = raw.as_array().filter(|a| a.len() >= 6).ok_or_else(invalid)?;
    let timestamp = value_to_i64(&values[0]).ok_or_else(invalid)?;
    let field = |i: usize| value_to_f64(&values[i]).ok_or_else(invalid);
    Ok(Candle(
        timestamp.saturating_mul(1000),
        field(1)?,
        field(2)?,
        field(3)?,
        field(4)?,
        field(5)?,
    ))
}

fn parse_levels(raw: &Value, side: &str) -> ExchangeResult<Vec<OrderbookLevel>> {
    let Some(levels) = raw.get(side) else {
        return Ok(Vec::new());
    };
    let levels = levels.as_array().ok_or_else(|| {
        ExchangeError::InvalidResponse(format!("order book {} is not an array", side))
    })?;
    levels
        .iter()
        .map(|level| {
            let pair = level.as_array().filter(|p| p.len() >= 2);
            match pair.and_then(|p| Some((value_to_f64(&p[0])?, value_to_f64(&p[1])?))) {
                Some((price, quantity)) => Ok(OrderbookLevel::new(price, quantity)),
                None => Err(ExchangeError::InvalidResponse(format!(
                    "malformed order book level: {}",
                    level
                ))),
            }
        })
        .collect()
}

/// Order book from `{"timestamp": <secs>, "bids": [[p, q]..], "asks": [[p, q]..]}`
///
/// Levels keep the exchange's ordering.
pub(crate) fn parse_order_book(raw: &Value, symbol: &str) -> ExchangeResult<Orderbook> {
    let timestamp = safe_seconds_as_ms(raw, "timestamp");
    Ok(Orderbook {
        symbol: symbol.to_string(),
        bids: parse_levels(raw, "bids")?,
        asks: parse_levels(raw, "asks")?,
        timestamp,
        datetime: timestamp.and_then(iso8601),
    })
}

// =============================================================================
// Orders
// =============================================================================

/// Map the exchange order state to a normalized status
pub fn parse_order_status(state: &str) -> Option<OrderStatus> {
    match state {
        "done" => Some(OrderStatus::Closed),
        "wait" => Some(OrderStatus::Open),
        "cancel" => Some(OrderStatus::Canceled),
        _ => None,
    }
}

/// Order from the exchange's order payload
pub(crate) fn parse_order(raw: &Value, symbol: Option<String>) -> ExchangeResult<Order> {
    let id = required_string(raw, "id", "order")?;
    let timestamp = safe_string(raw, "created_at").and_then(|s| parse8601(&s));
    let status = safe_string(raw, "state").and_then(|s| parse_order_status(&s));
    let order_type = safe_string(raw, "ord_type")
        .and_then(|t| OrderType::parse(&t))
        .ok_or_else(|| ExchangeError::InvalidResponse(format!("order has unknown ord_type: {}", raw)))?;
    let side = safe_string(raw, "side")
        .and_then(|s| OrderSide::parse(&s))
        .ok_or_else(|| ExchangeError::InvalidResponse(format!("order has unknown side: {}", raw)))?;

    Ok(Order {
        id,
        timestamp,
        datetime: timestamp.and_then(iso8601),
        status,
        symbol,
        order_type,
        side,
        price: safe_decimal(raw, "price"),
        amount: safe_decimal(raw, "volume"),
        filled: safe_decimal(raw, "executed_volume"),
        remaining: safe_decimal(raw, "remaining_volume"),
        info: raw.clone(),
    })
}

// =============================================================================
// Account
// =============================================================================

/// Balances from the `accounts` array of `members/me`
///
/// Known currency ids take the registry code; others are uppercased.
pub(crate) fn parse_balance(accounts: &Value, registry: &MarketRegistry) -> ExchangeResult<Balances> {
    let entries = accounts.as_array().ok_or_else(|| {
        ExchangeError::InvalidResponse(format!("accounts is not an array: {}", accounts))
    })?;
    let mut currencies = BTreeMap::new();
    for entry in entries {
        let currency_id = required_string(entry, "currency", "account")?;
        let code = registry
            .currency_by_id(&currency_id)
            .map(|c| c.code.clone())
            .unwrap_or_else(|| currency_id.to_uppercase());
        let free = safe_decimal(entry, "balance").unwrap_or(Decimal::ZERO);
        let used = safe_decimal(entry, "locked").unwrap_or(Decimal::ZERO);
        currencies.insert(code, Balance::new(free, used));
    }
    Ok(Balances {
        currencies,
        info: accounts.clone(),
    })
}
