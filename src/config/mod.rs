//! Configuration module
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `ExchangeSettings`, `WatchConfig`)
//! - YAML loading functionality (`load_config`)
//! - Logging setup (`logging::init_logging`)
//! - Application constants with environment variable overrides

pub mod constants;
pub mod logging;
mod loader;
mod types;

// Re-export types
pub use types::{AppConfig, ExchangeSettings, WatchConfig};

// Re-export loader functions
pub use loader::{load_config, load_config_from_str};
