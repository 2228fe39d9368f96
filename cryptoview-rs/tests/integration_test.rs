//! Integration tests for cryptoview-rs against an in-process fake exchange

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, TimeZone, Utc};
use cryptoview_rs::prelude::*;
use serde_json::{json, Value};

#[derive(Default)]
struct FakeExchange {
    kline_calls: AtomicUsize,
    info_calls: AtomicUsize,
    require_api_key: Option<String>,
}

fn interval_ms(code: &str) -> i64 {
    match code {
        "15m" => 15 * 60_000,
        "30m" => 30 * 60_000,
        "1h" => 3_600_000,
        "4h" => 4 * 3_600_000,
        "12h" => 12 * 3_600_000,
        _ => 86_400_000,
    }
}

async fn exchange_info(
    State(fake): State<Arc<FakeExchange>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    fake.info_calls.fetch_add(1, Ordering::SeqCst);

    if let Some(expected) = &fake.require_api_key {
        let sent = headers.get("X-MBX-APIKEY").and_then(|v| v.to_str().ok());
        if sent != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "code": -2015, "msg": "Invalid API-key" })),
            );
        }
    }

    (
        StatusCode::OK,
        Json(json!({
            "timezone": "UTC",
            "symbols": [
                { "symbol": "BTCAUD", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "AUD" },
                { "symbol": "ETHAUD", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "AUD" },
                { "symbol": "BTCUSDT", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "USDT" },
                { "symbol": "MANAAUD", "status": "BREAK", "baseAsset": "MANA", "quoteAsset": "AUD" }
            ]
        })),
    )
}

/// One bar per interval step between startTime and endTime (inclusive), up to `limit`.
async fn klines(
    State(fake): State<Arc<FakeExchange>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    fake.kline_calls.fetch_add(1, Ordering::SeqCst);

    let step = interval_ms(&params["interval"]);
    let start: i64 = params["startTime"].parse().unwrap();
    let end: i64 = params["endTime"].parse().unwrap();
    let limit: usize = params["limit"].parse().unwrap();

    let mut open = (start + step - 1) / step * step;
    let mut rows = Vec::new();
    while open <= end && rows.len() < limit {
        let price = 100.0 + (open / step % 50) as f64;
        rows.push(json!([
            open,
            format!("{:.2}", price),
            format!("{:.2}", price + 2.0),
            format!("{:.2}", price - 2.0),
            format!("{:.2}", price + 1.0),
            "12.5",
            open + step - 1,
            "0", 10, "0", "0", "0"
        ]));
        open += step;
    }
    Json(Value::Array(rows))
}

async fn spawn_exchange(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn fake_binance(fake: Arc<FakeExchange>) -> String {
    let router = Router::new()
        .route("/api/v3/exchangeInfo", get(exchange_info))
        .route("/api/v3/klines", get(klines))
        .with_state(fake);
    spawn_exchange(router).await
}

fn client_for(base_url: String) -> BinanceClient {
    BinanceClient::new(ExchangeConfig {
        base_url,
        timeout_secs: 5,
        ..ExchangeConfig::default()
    })
    .unwrap()
}

fn midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn test_bitcoin_resolves_to_btc_aud() {
    let fake = Arc::new(FakeExchange::default());
    let dashboard = Dashboard::new(client_for(fake_binance(fake.clone()).await), "AUD");

    let selection = Selection {
        asset: CryptoAsset::lookup("Bitcoin").unwrap(),
        ..Selection::default()
    };
    let view = dashboard.render_at(&selection, midnight()).await.unwrap();

    assert_eq!(view.pair.symbol, "BTCAUD");
    assert_eq!(view.pair.quote_asset, "AUD");
    assert_eq!(view.bar_count, 48);
    assert_eq!(fake.info_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fake.kline_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_klines_paginate_over_long_windows() {
    let fake = Arc::new(FakeExchange::default());
    let client = client_for(fake_binance(fake.clone()).await);

    let window = TimeWindow::trailing(midnight(), chrono::Duration::days(60));
    let series = client
        .klines("BTCAUD", Interval::OneHour, window)
        .await
        .unwrap();

    assert_eq!(series.len(), 60 * 24);
    assert_eq!(fake.kline_calls.load(Ordering::SeqCst), 2);
    assert_eq!(series.first().unwrap().timestamp, window.start);
    assert!(series.last().unwrap().timestamp < window.end);
    assert!(series
        .timestamps()
        .windows(2)
        .all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_day_range_change_replaces_series() {
    let fake = Arc::new(FakeExchange::default());
    let dashboard = Dashboard::new(client_for(fake_binance(fake.clone()).await), "AUD");

    let two_days = Selection::default();
    let thirty_days = Selection {
        day_range: "30 days".parse().unwrap(),
        ..two_days
    };

    let before = dashboard.render_at(&two_days, midnight()).await.unwrap();
    let calls_before = fake.kline_calls.load(Ordering::SeqCst);
    let after = dashboard.render_at(&thirty_days, midnight()).await.unwrap();

    assert_eq!(fake.kline_calls.load(Ordering::SeqCst), calls_before + 1);
    assert_eq!(before.bar_count, 48);
    assert_eq!(after.bar_count, 720);
    assert_eq!(after.figure.candlestick().unwrap().x.len(), 720);
}

#[tokio::test]
async fn test_halted_pair_is_not_resolved() {
    let fake = Arc::new(FakeExchange::default());
    let dashboard = Dashboard::new(client_for(fake_binance(fake.clone()).await), "AUD");

    let selection = Selection {
        asset: CryptoAsset::lookup("MANA").unwrap(),
        ..Selection::default()
    };
    let err = dashboard.render_at(&selection, midnight()).await.unwrap_err();

    assert!(matches!(err, DashboardError::SymbolNotFound { .. }));
    assert_eq!(fake.kline_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let fake = Arc::new(FakeExchange {
        require_api_key: Some("test-key".to_string()),
        ..FakeExchange::default()
    });
    let base_url = fake_binance(fake.clone()).await;

    let anonymous = client_for(base_url.clone());
    let err = anonymous.trading_pairs("AUD").await.unwrap_err();
    match err {
        DashboardError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("Invalid API-key"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }

    let keyed = BinanceClient::new(ExchangeConfig {
        base_url,
        api_key: Some("test-key".to_string()),
        api_secret: Some("test-secret".to_string()),
        ..ExchangeConfig::default()
    })
    .unwrap();
    let pairs = keyed.trading_pairs("AUD").await.unwrap();
    assert_eq!(pairs.len(), 2);
    assert!(!format!("{:?}", keyed.config()).contains("test-secret"));
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let router = Router::new().route(
        "/api/v3/exchangeInfo",
        get(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", "7")],
                Json(json!({ "code": -1003, "msg": "Too many requests" })),
            )
        }),
    );
    let client = client_for(spawn_exchange(router).await);

    let err = client.trading_pairs("AUD").await.unwrap_err();
    assert!(err.is_network());
    assert!(matches!(
        err,
        DashboardError::RateLimited {
            status: 429,
            retry_after_secs: Some(7)
        }
    ));
}

#[tokio::test]
async fn test_unreachable_exchange_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{}", addr));
    let err = client.trading_pairs("AUD").await.unwrap_err();

    assert!(matches!(err, DashboardError::Network(_)));
    assert_eq!(err.kind(), "network");
}

#[tokio::test]
async fn test_malformed_payload_is_decode_error() {
    let router = Router::new().route(
        "/api/v3/exchangeInfo",
        get(|| async { Json(json!({ "unexpected": true })) }),
    );
    let client = client_for(spawn_exchange(router).await);

    let err = client.trading_pairs("AUD").await.unwrap_err();
    assert!(matches!(err, DashboardError::Decode(_)));
}
