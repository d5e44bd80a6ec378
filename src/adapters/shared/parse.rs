//! Field-level parsing helpers for raw exchange payloads
//!
//! Exchanges send numbers both as JSON numbers and as numeric strings, and
//! timestamps as epoch seconds or ISO-8601 text. These helpers read such
//! fields leniently, returning `None` when a field is absent or malformed.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

/// Shortest funding address accepted by `check_address`
pub const MIN_FUNDING_ADDRESS_LENGTH: usize = 1;

/// String field; numbers are rendered with their JSON representation
pub fn safe_string(obj: &Value, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Float from a JSON number or numeric string
pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn safe_f64(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(value_to_f64)
}

/// Exact decimal from a JSON number or numeric string
pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    }
}

pub fn safe_decimal(obj: &Value, key: &str) -> Option<Decimal> {
    obj.get(key).and_then(value_to_decimal)
}

/// Integer from a JSON number (floats truncated) or numeric string
pub fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Epoch-seconds field converted to milliseconds
pub fn safe_seconds_as_ms(obj: &Value, key: &str) -> Option<i64> {
    obj.get(key)
        .and_then(value_to_i64)
        .map(|secs| secs.saturating_mul(1000))
}

/// Parse an ISO-8601 timestamp into Unix milliseconds
///
/// Accepts RFC 3339, offsets without a colon, and naive timestamps
/// (interpreted as UTC) with either `T` or a space as separator.
pub fn parse8601(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.timestamp_millis());
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    None
}

/// Render Unix milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn iso8601(timestamp_ms: i64) -> Option<String> {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Keep entries at or after `since`, then the first `limit` of them
///
/// Entries without a timestamp are dropped when `since` is set.
pub fn filter_by_since_limit<T, F>(
    items: Vec<T>,
    since: Option<i64>,
    limit: Option<usize>,
    timestamp: F,
) -> Vec<T>
where
    F: Fn(&T) -> Option<i64>,
{
    let iter = items.into_iter().filter(|item| match since {
        Some(since) => timestamp(item).is_some_and(|ts| ts >= since),
        None => true,
    });
    match limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}

/// Reject empty, blank-containing, too short, or single-character-repeated addresses
pub fn check_address(address: &str) -> ExchangeResult<&str> {
    let first = address.chars().next();
    let all_same = address.chars().all(|c| Some(c) == first);
    if all_same
        || address.chars().count() < MIN_FUNDING_ADDRESS_LENGTH
        || address.contains(' ')
    {
        return Err(ExchangeError::InvalidAddress(format!(
            "address is invalid or has less than {} characters: \"{}\"",
            MIN_FUNDING_ADDRESS_LENGTH, address
        )));
    }
    Ok(address)
}
