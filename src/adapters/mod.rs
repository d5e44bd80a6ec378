//! Exchange adapters
//!
//! This module provides the core abstractions for talking to exchange REST
//! APIs, the shared HTTP/market plumbing, and the TideBit implementation.

pub mod errors;
pub mod shared;
pub mod tidebit;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use errors::{ExchangeError, ExchangeResult};
pub use traits::{ExchangeAdapter, HttpMethod, HttpRequest, HttpTransport};
pub use types::{
    Balance, Balances, Candle, Currency, DepositAddress, Market, Order, OrderSide, OrderStatus,
    OrderType, Orderbook, OrderbookLevel, Params, Ticker, Trade, WithdrawalReceipt,
};
pub use tidebit::{TidebitAdapter, TidebitConfig};
