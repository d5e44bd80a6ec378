//! Shared helpers for exchange adapters
//!
//! This module provides the reqwest-backed HTTP transport, the market
//! registry, and the field-parsing helpers every REST adapter uses.

pub mod http;
pub mod markets;
pub mod parse;

pub use http::{create_http_client, ReqwestTransport};
pub use markets::MarketRegistry;
