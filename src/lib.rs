//! TideBit exchange connector
//!
//! REST client for the TideBit exchange:
//! - Unified `ExchangeAdapter` trait and data types
//! - Signed private requests (HMAC-SHA256)
//! - Exchange error payload mapping
//! - YAML/env configuration and structured logging

pub mod adapters;
pub mod config;
pub mod error;

pub use error::AppError;
