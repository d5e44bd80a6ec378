//! TideBit market snapshot
//!
//! 1. Loads `.env`, logging and `config.yaml` (or `CONFIG_PATH`)
//! 2. Loads markets
//! 3. Prints ticker, order book and candles for each watched symbol
//! 4. Prints balances when API credentials are configured

use std::path::PathBuf;

use anyhow::Context;
use tracing::{error, info, warn};

use tidebit_connector::adapters::tidebit::{TidebitAdapter, TidebitConfig};
use tidebit_connector::adapters::ExchangeAdapter;
use tidebit_connector::config::{self, constants, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();
    constants::log_configuration();

    let config_path =
        PathBuf::from(std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string()));
    let app_config = config::load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    info!(
        phase = "init",
        symbols = ?app_config.watch.symbols,
        timeframe = %app_config.watch.timeframe,
        "Configuration loaded"
    );

    let adapter = TidebitAdapter::new(app_config.tidebit_config(TidebitConfig::from_env()));
    let markets = adapter.load_markets(false).await.context("loading markets")?;
    println!("{} markets available on {}", markets.len(), adapter.describe().name);

    let watch = &app_config.watch;
    for symbol in &watch.symbols {
        match adapter.fetch_ticker(symbol).await {
            Ok(ticker) => println!(
                "{:<10} last={:?} bid={:?} ask={:?} vol={:?}",
                ticker.symbol, ticker.last, ticker.bid, ticker.ask, ticker.base_volume
            ),
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Ticker fetch failed");
                continue;
            }
        }

        match adapter.fetch_order_book(symbol, watch.order_book_limit).await {
            Ok(book) => println!(
                "{:<10} best_bid={:?} best_ask={:?} depth={}/{}",
                symbol,
                book.best_bid(),
                book.best_ask(),
                book.bids.len(),
                book.asks.len()
            ),
            Err(e) => warn!(symbol = %symbol, error = %e, "Order book fetch failed"),
        }

        match adapter
            .fetch_ohlcv(symbol, &watch.timeframe, None, Some(watch.ohlcv_limit))
            .await
        {
            Ok(candles) => match candles.last() {
                Some(c) => println!(
                    "{:<10} {} candles ({}), last close={} volume={}",
                    symbol,
                    candles.len(),
                    watch.timeframe,
                    c.close(),
                    c.volume()
                ),
                None => println!("{:<10} no candles", symbol),
            },
            Err(e) => warn!(symbol = %symbol, error = %e, "Candle fetch failed"),
        }
    }

    if adapter.config().has_credentials() {
        let balances = adapter.fetch_balance().await.context("fetching balance")?;
        for (code, balance) in &balances.currencies {
            println!(
                "{:<6} free={} used={} total={}",
                code, balance.free, balance.used, balance.total
            );
        }
    } else {
        info!("No API credentials configured, skipping balance");
    }

    Ok(())
}
