use std::sync::Arc;

use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use cryptoview_rs::exchange::MarketData;
use cryptoview_rs::pipeline::ChartView;
use cryptoview_rs::selection::{DayRange, Interval, Selection, SelectionQuery, CRYPTO_CATALOG};
use serde_json::{json, Value};
use shared::{DashboardPage, SelectOption};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppContext;

pub fn router<S: MarketData + 'static>(context: Arc<AppContext<S>>) -> Router {
    Router::new()
        .route("/", get(index::<S>))
        .route("/api/options", get(options::<S>))
        .route("/api/figure", get(figure::<S>))
        .route("/health", get(health_check))
        .route("/version", get(version::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

async fn index<S: MarketData + 'static>(
    State(context): State<Arc<AppContext<S>>>,
) -> Result<Html<String>, ApiError> {
    let defaults = Selection::default();

    let page = DashboardPage {
        quote_currency: context.quote_currency().to_string(),
        intervals: Interval::ALL
            .iter()
            .map(|i| SelectOption::new(i.label(), i.code(), *i == defaults.interval))
            .collect(),
        cryptos: CRYPTO_CATALOG
            .iter()
            .map(|a| SelectOption::new(a.label, a.ticker, *a == defaults.asset))
            .collect(),
        day_ranges: DayRange::all()
            .map(|d| SelectOption::new(d.label(), d.days().to_string(), d == defaults.day_range))
            .collect(),
        show_range_slider: defaults.show_range_slider,
        figure_endpoint: "/api/figure".to_string(),
    };

    Ok(Html(page.render()?))
}

async fn options<S: MarketData + 'static>(State(context): State<Arc<AppContext<S>>>) -> Json<Value> {
    let defaults = Selection::default();
    Json(json!({
        "quote_currency": context.quote_currency(),
        "intervals": Interval::ALL
            .iter()
            .map(|i| json!({ "value": i.code(), "label": i.label() }))
            .collect::<Vec<_>>(),
        "cryptos": CRYPTO_CATALOG
            .iter()
            .map(|a| json!({ "value": a.ticker, "label": a.label }))
            .collect::<Vec<_>>(),
        "day_range": { "min": DayRange::MIN, "max": DayRange::MAX },
        "defaults": defaults,
    }))
}

/// Run the full fetch → averages → figure pipeline for the submitted controls.
async fn figure<S: MarketData + 'static>(
    State(context): State<Arc<AppContext<S>>>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<ChartView>, ApiError> {
    let selection = Selection::try_from(query)?;

    let render_context = context.clone();
    let view = context
        .gate
        .run(async move { render_context.dashboard.render(&selection).await })
        .await??;

    Ok(Json(view))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn version<S: MarketData + 'static>(State(context): State<Arc<AppContext<S>>>) -> Json<Value> {
    let build_time_raw = option_env!("BUILD_TIME").unwrap_or("unknown");
    let build_time = build_time_raw
        .parse::<i64>()
        .ok()
        .and_then(|epoch| chrono::DateTime::from_timestamp(epoch, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| build_time_raw.to_string());

    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "branch": option_env!("GIT_BRANCH").unwrap_or("unknown"),
        "tag": option_env!("GIT_TAG").unwrap_or("unknown"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
        "build_time": build_time,
        "os": option_env!("CARGO_CFG_TARGET_OS").unwrap_or("unknown"),
        "uptime_secs": (chrono::Utc::now() - context.started_at).num_seconds(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoview_rs::prelude::{DashboardError, PriceBar, PriceSeries, TimeWindow, TradingPair};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// Serves an hourly flat series for BTC/AUD and ETH/AUD, and reports a
    /// rate limit for DOGE.
    struct FakeMarket;

    impl MarketData for FakeMarket {
        async fn trading_pairs(&self, quote: &str) -> cryptoview_rs::Result<Vec<TradingPair>> {
            Ok(vec![
                TradingPair::new("BTCAUD", "BTC", quote),
                TradingPair::new("ETHAUD", "ETH", quote),
                TradingPair::new("DOGEAUD", "DOGE", quote),
            ])
        }

        async fn price_history(
            &self,
            pair: &TradingPair,
            interval: Interval,
            window: TimeWindow,
        ) -> cryptoview_rs::Result<PriceSeries> {
            if pair.base_asset == "DOGE" {
                return Err(DashboardError::RateLimited {
                    status: 429,
                    retry_after_secs: None,
                });
            }
            let mut bars = Vec::new();
            let mut ts = window.start;
            while ts < window.end {
                bars.push(PriceBar::new(ts, 10.0, 11.0, 9.0, 10.5, 1.0));
                ts = ts + interval.duration();
            }
            Ok(PriceSeries::from_bars(bars))
        }
    }

    fn app() -> Router {
        router(AppContext::new(FakeMarket, "AUD"))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Crypto vs AUD"));
        assert!(html.contains(r#"<option value="BTC" selected>Bitcoin</option>"#));
        assert!(html.contains(r#"<option value="365">365 days</option>"#));
    }

    #[tokio::test]
    async fn test_options() {
        let (status, body) = get_json("/api/options").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intervals"].as_array().unwrap().len(), 6);
        assert_eq!(body["cryptos"].as_array().unwrap().len(), 12);
        assert_eq!(body["day_range"]["max"], 365);
        assert_eq!(body["defaults"]["interval"], "1h");
    }

    #[tokio::test]
    async fn test_figure_for_selection() {
        let (status, body) =
            get_json("/api/figure?interval=1h&symbol=Bitcoin&days=2&rangeslider=false").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pair"]["symbol"], "BTCAUD");
        assert_eq!(body["bar_count"], 48);
        assert_eq!(body["figure"]["data"].as_array().unwrap().len(), 4);
        assert_eq!(body["figure"]["layout"]["xaxis"]["rangeslider"]["visible"], false);
        assert_eq!(
            body["figure"]["layout"]["title"]["text"],
            "BTC vs AUD Candlestick Chart - 1 Hour"
        );
    }

    #[tokio::test]
    async fn test_figure_uses_defaults() {
        let (status, body) = get_json("/api/figure").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"]["day_range"], 2);
        assert_eq!(body["figure"]["layout"]["xaxis"]["rangeslider"]["visible"], true);
    }

    #[tokio::test]
    async fn test_unlisted_symbol_is_not_found() {
        let (status, body) = get_json("/api/figure?symbol=SOL").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "symbol_not_found");
        assert!(body["error"].as_str().unwrap().contains("SOL"));
    }

    #[tokio::test]
    async fn test_invalid_day_range_is_bad_request() {
        let (status, body) = get_json("/api/figure?days=400").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_selection");
    }

    #[tokio::test]
    async fn test_malformed_toggle_is_json_bad_request() {
        let (status, body) = get_json("/api/figure?rangeslider=yes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_selection");
        assert!(body["error"].as_str().unwrap().contains("yes"));
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_as_unavailable() {
        let (status, body) = get_json("/api/figure?symbol=DOGE").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["kind"], "rate_limited");
    }

    #[tokio::test]
    async fn test_version() {
        let (status, body) = get_json("/version").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["uptime_secs"].as_i64().unwrap() >= 0);
    }
}
