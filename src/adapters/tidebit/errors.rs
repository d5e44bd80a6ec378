//! TideBit error payload mapping
//!
//! Failed responses carry `{"error": {"code": ..., "message": ...}}`. Known
//! codes become typed errors; other codes become a generic exchange error
//! carrying the raw payload.

use serde_json::Value;

use crate::adapters::errors::ExchangeError;
use crate::adapters::shared::parse::safe_string;

/// Typed error kinds the exchange reports by code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCodeKind {
    InsufficientFunds,
    OrderNotFound,
}

/// Exchange error codes with a dedicated error kind
pub const ERROR_CODES: &[(&str, ErrorCodeKind)] = &[
    ("2002", ErrorCodeKind::InsufficientFunds),
    ("2003", ErrorCodeKind::OrderNotFound),
];

impl ErrorCodeKind {
    pub fn from_code(code: &str) -> Option<Self> {
        ERROR_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| *kind)
    }

    pub fn into_error(self, feedback: String) -> ExchangeError {
        match self {
            ErrorCodeKind::InsufficientFunds => ExchangeError::InsufficientFunds(feedback),
            ErrorCodeKind::OrderNotFound => ExchangeError::OrderNotFound(feedback),
        }
    }
}

/// Translate a transport error whose body is an exchange error payload
///
/// Errors without such a payload are returned unchanged.
pub fn map_exchange_error(err: ExchangeError) -> ExchangeError {
    let payload = match &err {
        ExchangeError::HttpStatus { body, .. } => serde_json::from_str::<Value>(body).ok(),
        _ => None,
    };
    let Some(payload) = payload else {
        return err;
    };
    let Some(error) = payload.get("error").filter(|e| e.is_object()) else {
        return err;
    };

    let code = safe_string(error, "code");
    let feedback = format!("tidebit {}", payload);
    let mapped = match code.as_deref().and_then(ErrorCodeKind::from_code) {
        Some(kind) => kind.into_error(feedback),
        None => ExchangeError::Exchange(feedback),
    };
    tracing::warn!(
        exchange = "tidebit",
        code = code.as_deref().unwrap_or("none"),
        error = %mapped,
        "Exchange returned an error payload"
    );
    mapped
}
