//! TideBit REST integration tests
//!
//! Drives `TidebitAdapter` through the real reqwest transport against a local
//! mockito server, checking request shape and response mapping end to end.
//!
//! # Running the tests
//! ```bash
//! cargo test --test tidebit_rest
//! ```

use std::str::FromStr;

use mockito::{Matcher, Mock, ServerGuard};
use rust_decimal::Decimal;

use tidebit_connector::adapters::errors::ExchangeError;
use tidebit_connector::adapters::tidebit::{TidebitAdapter, TidebitConfig};
use tidebit_connector::adapters::types::{OrderSide, OrderStatus, OrderType, Params};
use tidebit_connector::adapters::ExchangeAdapter;

// =============================================================================
// Helpers
// =============================================================================

const MARKETS: &str = r#"[
    {"id": "btchkd", "name": "BTC/HKD"},
    {"id": "ethhkd", "name": "ETH/HKD"}
]"#;

fn config(server: &ServerGuard) -> TidebitConfig {
    TidebitConfig {
        base_url: server.url(),
        timeout_ms: 5_000,
        ..Default::default()
    }
    .with_credentials("test-access-key", "test-secret")
}

async fn mock_markets(server: &mut ServerGuard) -> Mock {
    mock_markets_hit(server, 1).await
}

async fn mock_markets_hit(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("GET", "/api/v2/markets.json")
        .expect(hits)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MARKETS)
        .create_async()
        .await
}

fn signed() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("access_key".into(), "test-access-key".into()),
        Matcher::Regex("tonce=[0-9]{13}".into()),
        Matcher::Regex("signature=[0-9a-f]{64}$".into()),
    ])
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_load_markets_and_ticker() {
    let mut server = mockito::Server::new_async().await;
    let markets = mock_markets(&mut server).await;
    let ticker = server
        .mock("GET", "/api/v2/tickers/btchkd.json")
        .with_status(200)
        .with_body(r#"{"at":1524024000,"ticker":{"buy":"61000.0","sell":"61100.0","low":"60000","high":"62000","last":"61050","vol":"12.5"}}"#)
        .create_async()
        .await;

    let adapter = TidebitAdapter::new(config(&server));
    let loaded = adapter.load_markets(false).await.unwrap();
    assert_eq!(loaded.len(), 2);

    let t = adapter.fetch_ticker("BTC/HKD").await.unwrap();
    assert_eq!(t.symbol, "BTC/HKD");
    assert_eq!(t.timestamp, Some(1_524_024_000_000));
    assert_eq!(t.bid, Some(61000.0));
    assert_eq!(t.ask, Some(61100.0));
    assert_eq!(t.base_volume, Some(12.5));

    markets.assert_async().await;
    ticker.assert_async().await;
}

#[tokio::test]
async fn test_order_book_query() {
    let mut server = mockito::Server::new_async().await;
    mock_markets(&mut server).await;
    let depth = server
        .mock("GET", "/api/v2/depth.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("market".into(), "ethhkd".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"timestamp":1524024000,"bids":[["4000","1.5"],["3990","2"]],"asks":[["4010","0.5"]]}"#)
        .create_async()
        .await;

    let adapter = TidebitAdapter::new(config(&server));
    let book = adapter.fetch_order_book("ETH/HKD", Some(2)).await.unwrap();
    assert_eq!(book.symbol, "ETH/HKD");
    assert_eq!(book.bids.len(), 2);
    assert_eq!(book.best_bid(), Some(4000.0));
    assert_eq!(book.best_ask(), Some(4010.0));
    depth.assert_async().await;
}

#[tokio::test]
async fn test_ohlcv_null_body_is_empty() {
    let mut server = mockito::Server::new_async().await;
    mock_markets(&mut server).await;
    let k = server
        .mock("GET", "/api/v2/k.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("market".into(), "btchkd".into()),
            Matcher::UrlEncoded("period".into(), "1".into()),
            Matcher::UrlEncoded("limit".into(), "30".into()),
            Matcher::UrlEncoded("timestamp".into(), "1800000".into()),
        ]))
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;

    let adapter = TidebitAdapter::new(config(&server));
    let candles = adapter.fetch_ohlcv("BTC/HKD", "1m", None, None).await.unwrap();
    assert!(candles.is_empty());
    k.assert_async().await;
}

// =============================================================================
// Private endpoints
// =============================================================================

#[tokio::test]
async fn test_fetch_balance_signed_get() {
    let mut server = mockito::Server::new_async().await;
    mock_markets(&mut server).await;
    let me = server
        .mock("GET", "/api/v2/members/me.json")
        .match_query(signed())
        .with_status(200)
        .with_body(r#"{"accounts":[{"currency":"hkd","balance":"100.5","locked":"0.5"},{"currency":"eth","balance":"2","locked":"1"}]}"#)
        .create_async()
        .await;

    let adapter = TidebitAdapter::new(config(&server));
    let balances = adapter.fetch_balance().await.unwrap();
    assert_eq!(balances.get("HKD").unwrap().total, dec("101.0"));
    assert_eq!(balances.get("ETH").unwrap().free, dec("2"));
    assert_eq!(balances.get("ETH").unwrap().used, dec("1"));
    me.assert_async().await;
}

#[tokio::test]
async fn test_create_limit_order_signed_post() {
    let mut server = mockito::Server::new_async().await;
    mock_markets(&mut server).await;
    let orders = server
        .mock("POST", "/api/v2/orders.json")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("market".into(), "btchkd".into()),
            Matcher::UrlEncoded("side".into(), "buy".into()),
            Matcher::UrlEncoded("ord_type".into(), "limit".into()),
            Matcher::UrlEncoded("volume".into(), "0.25".into()),
            Matcher::UrlEncoded("price".into(), "60000.5".into()),
            signed(),
        ]))
        .with_status(201)
        .with_body(r#"{"id":42,"side":"buy","ord_type":"limit","price":"60000.5","state":"wait","market":"btchkd","created_at":"2018-04-18T12:00:00+08:00","volume":"0.25","remaining_volume":"0.25","executed_volume":"0"}"#)
        .create_async()
        .await;

    let adapter = TidebitAdapter::new(config(&server));
    let order = adapter
        .create_order("BTC/HKD", OrderType::Limit, OrderSide::Buy, dec("0.25"), Some(dec("60000.5")))
        .await
        .unwrap();
    assert_eq!(order.id, "42");
    assert_eq!(order.status, Some(OrderStatus::Open));
    assert_eq!(order.symbol.as_deref(), Some("BTC/HKD"));
    assert_eq!(order.timestamp, Some(1_524_024_000_000));
    assert_eq!(order.remaining, Some(dec("0.25")));
    orders.assert_async().await;
}

#[tokio::test]
async fn test_insufficient_funds_error_payload() {
    let mut server = mockito::Server::new_async().await;
    mock_markets(&mut server).await;
    server
        .mock("POST", "/api/v2/orders.json")
        .with_status(400)
        .with_body(r#"{"error":{"code":2002,"message":"Failed to create order. Reason: cannot lock funds (amount: 1)"}}"#)
        .create_async()
        .await;

    let adapter = TidebitAdapter::new(config(&server));
    let result = adapter
        .create_order("BTC/HKD", OrderType::Market, OrderSide::Sell, dec("1"), None)
        .await;
    match result {
        Err(ExchangeError::InsufficientFunds(msg)) => assert!(msg.contains("cannot lock funds")),
        other => panic!("Expected InsufficientFunds, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_already_canceled_order() {
    let mut server = mockito::Server::new_async().await;
    mock_markets(&mut server).await;
    let delete = server
        .mock("POST", "/api/v2/order/delete.json")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "42".into()),
            signed(),
        ]))
        .with_status(200)
        .with_body(r#"{"id":42,"side":"buy","ord_type":"limit","price":"1","state":"cancel","market":"btchkd","created_at":"2018-04-18T12:00:00+08:00","volume":"1","remaining_volume":"1","executed_volume":"0"}"#)
        .create_async()
        .await;

    let adapter = TidebitAdapter::new(config(&server));
    let result = adapter.cancel_order("42").await;
    assert!(matches!(result, Err(ExchangeError::OrderNotFound(_))));
    delete.assert_async().await;
}

#[tokio::test]
async fn test_withdraw_without_account_id_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let markets = mock_markets_hit(&mut server, 0).await;
    let apply = server
        .mock("POST", "/api/v2/withdraws/apply.json")
        .expect(0)
        .create_async()
        .await;

    let adapter = TidebitAdapter::new(config(&server));
    let result = adapter
        .withdraw("BTC", dec("0.1"), "1BoatSLRHtKNngkdXEeobR76b53LETtpyT", None, &Params::new())
        .await;
    assert!(matches!(result, Err(ExchangeError::Exchange(_))));

    apply.assert_async().await;
    markets.assert_async().await;
}

#[tokio::test]
async fn test_private_call_without_credentials() {
    let mut server = mockito::Server::new_async().await;
    mock_markets(&mut server).await;
    let me = server
        .mock("GET", "/api/v2/members/me.json")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = TidebitConfig {
        base_url: server.url(),
        ..Default::default()
    };
    let adapter = TidebitAdapter::new(config);
    let result = adapter.fetch_balance().await;
    assert!(matches!(result, Err(ExchangeError::AuthenticationFailed(_))));
    me.assert_async().await;
}
