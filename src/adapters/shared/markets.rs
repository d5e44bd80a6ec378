//! Market and currency registry
//!
//! Holds the markets loaded from an exchange, indexed by exchange id and by
//! normalized symbol, plus the currency table derived from them and the
//! currency alias table used to normalize exchange-specific codes.

use std::collections::{BTreeMap, HashMap};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{Currency, Market};

/// Exchange-specific currency codes and their canonical replacements
pub const DEFAULT_CURRENCY_ALIASES: &[(&str, &str)] = &[
    ("XBT", "BTC"),
    ("BCC", "BCH"),
    ("DRK", "DASH"),
    ("BCHABC", "BCH"),
    ("BCHSV", "BSV"),
];

/// Registry of loaded markets and currencies
#[derive(Debug, Clone)]
pub struct MarketRegistry {
    markets_by_id: HashMap<String, Market>,
    markets_by_symbol: BTreeMap<String, Market>,
    currencies: BTreeMap<String, Currency>,
    /// Keyed by lowercase exchange id
    currencies_by_id: HashMap<String, Currency>,
    aliases: HashMap<String, String>,
    loaded: bool,
}

impl MarketRegistry {
    /// Empty registry with the default alias table
    pub fn new() -> Self {
        Self::with_aliases(std::iter::empty::<(String, String)>())
    }

    /// Empty registry with `extra` aliases layered over the defaults
    pub fn with_aliases<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut aliases: HashMap<String, String> = DEFAULT_CURRENCY_ALIASES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        for (from, to) in extra {
            aliases.insert(from.into(), to.into());
        }
        Self {
            markets_by_id: HashMap::new(),
            markets_by_symbol: BTreeMap::new(),
            currencies: BTreeMap::new(),
            currencies_by_id: HashMap::new(),
            aliases,
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the registry contents with `markets`
    pub fn load(&mut self, markets: Vec<Market>) {
        self.markets_by_id.clear();
        self.markets_by_symbol.clear();
        self.currencies.clear();
        self.currencies_by_id.clear();

        for market in markets {
            for (id, code) in [
                (&market.base_id, &market.base),
                (&market.quote_id, &market.quote),
            ] {
                let currency = Currency {
                    id: id.clone(),
                    code: code.clone(),
                };
                self.currencies_by_id
                    .insert(id.to_lowercase(), currency.clone());
                // First market to name a code keeps it (BTC before an aliased XBT)
                self.currencies.entry(code.clone()).or_insert(currency);
            }
            self.markets_by_id.insert(market.id.clone(), market.clone());
            self.markets_by_symbol.insert(market.symbol.clone(), market);
        }
        self.loaded = true;
    }

    /// Loaded markets ordered by symbol
    pub fn markets(&self) -> Vec<Market> {
        self.markets_by_symbol.values().cloned().collect()
    }

    pub fn market_by_id(&self, id: &str) -> Option<&Market> {
        self.markets_by_id.get(id)
    }

    pub fn market_by_symbol(&self, symbol: &str) -> Option<&Market> {
        self.markets_by_symbol.get(symbol)
    }

    /// Market for a normalized symbol, or `UnknownSymbol`
    pub fn market(&self, symbol: &str) -> ExchangeResult<&Market> {
        self.market_by_symbol(symbol)
            .ok_or_else(|| ExchangeError::UnknownSymbol(symbol.to_string()))
    }

    /// Currency for a normalized code, or `UnknownSymbol`
    pub fn currency(&self, code: &str) -> ExchangeResult<&Currency> {
        self.currencies
            .get(code)
            .ok_or_else(|| ExchangeError::UnknownSymbol(format!("currency {}", code)))
    }

    /// Currency for an exchange id, case-insensitive
    pub fn currency_by_id(&self, id: &str) -> Option<&Currency> {
        self.currencies_by_id.get(&id.to_lowercase())
    }

    /// Canonical code for an exchange currency code; unknown codes pass through
    pub fn currency_alias(&self, raw_code: &str) -> String {
        self.aliases
            .get(raw_code)
            .cloned()
            .unwrap_or_else(|| raw_code.to_string())
    }
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self::new()
    }
}
