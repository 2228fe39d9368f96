//! Binance spot REST client

use std::fmt;
use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::data::PriceSeries;
use crate::exchange::wire::{parse_kline, ApiErrorBody, ExchangeInfo};
use crate::exchange::{MarketData, TimeWindow, TradingPair};
use crate::selection::Interval;
use crate::{DashboardError, Result};

/// Largest page `/api/v3/klines` serves.
pub const MAX_KLINES_PER_REQUEST: usize = 1000;

/// Exchange connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// REST root, e.g. "https://api.binance.com"
    pub base_url: String,
    /// Sent as `X-MBX-APIKEY` when present
    pub api_key: Option<String>,
    /// Loaded with the key; public market endpoints never need it
    pub api_secret: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Klines requested per page
    pub page_limit: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            api_key: None,
            api_secret: None,
            timeout_secs: 15,
            page_limit: MAX_KLINES_PER_REQUEST,
        }
    }
}

impl fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("page_limit", &self.page_limit)
            .finish()
    }
}

/// Binance market data client
#[derive(Debug, Clone)]
pub struct BinanceClient {
    config: ExchangeConfig,
    client: reqwest::Client,
}

impl BinanceClient {
    pub fn new(config: ExchangeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(
            "Binance client ready: {} (api key {})",
            config.base_url,
            if config.api_key.is_some() { "set" } else { "not set" }
        );

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Every pair listed on the exchange that is currently trading.
    pub async fn exchange_pairs(&self) -> Result<Vec<TradingPair>> {
        let info: ExchangeInfo = self.get_json("/api/v3/exchangeInfo", &[]).await?;
        Ok(info
            .symbols
            .into_iter()
            .filter(|s| s.is_trading())
            .map(TradingPair::from)
            .collect())
    }

    /// Download klines for `symbol` opening inside `window`.
    ///
    /// Requests pages of `page_limit` bars and keeps going from the last
    /// open time until a short page comes back or the window is covered.
    pub async fn klines(
        &self,
        symbol: &str,
        interval: Interval,
        window: TimeWindow,
    ) -> Result<PriceSeries> {
        let limit = self.config.page_limit.clamp(1, MAX_KLINES_PER_REQUEST);
        let end_ms = window.end.timestamp_millis();
        let mut start_ms = window.start.timestamp_millis();
        let mut bars = Vec::new();
        let mut pages = 0usize;

        while start_ms < end_ms {
            let rows: Vec<Vec<Value>> = self
                .get_json(
                    "/api/v3/klines",
                    &[
                        ("symbol", symbol.to_string()),
                        ("interval", interval.code().to_string()),
                        ("startTime", start_ms.to_string()),
                        // endTime is inclusive on the exchange side
                        ("endTime", (end_ms - 1).to_string()),
                        ("limit", limit.to_string()),
                    ],
                )
                .await?;
            pages += 1;

            let page_len = rows.len();
            let mut last_open_ms = None;
            for row in &rows {
                let bar = parse_kline(row)?;
                last_open_ms = Some(bar.timestamp.timestamp_millis());
                bars.push(bar);
            }
            debug!("klines {} {} page {}: {} bars", symbol, interval, pages, page_len);

            match last_open_ms {
                Some(open_ms) if page_len >= limit => start_ms = open_ms + 1,
                _ => break,
            }
        }

        let series = PriceSeries::from_bars(bars);
        info!(
            "Fetched {} {} bars for {} in {} page(s)",
            series.len(),
            interval,
            symbol,
            pages
        );
        Ok(series)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.config.api_key {
            request = request.header("X-MBX-APIKEY", key);
        }

        let response = request.send().await?;
        let status = response.status();

        // 418 is Binance's ban after ignoring repeated 429s
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::IM_A_TEAPOT {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            warn!("Rate limited on {} (HTTP {})", path, status.as_u16());
            return Err(DashboardError::RateLimited {
                status: status.as_u16(),
                retry_after_secs,
            });
        }

        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| format!("{} (code {})", e.msg, e.code))
                .unwrap_or(body);
            warn!("Exchange error on {}: HTTP {} {}", path, status.as_u16(), message);
            return Err(DashboardError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl MarketData for BinanceClient {
    async fn trading_pairs(&self, quote: &str) -> Result<Vec<TradingPair>> {
        let pairs: Vec<TradingPair> = self
            .exchange_pairs()
            .await?
            .into_iter()
            .filter(|p| p.quote_asset.eq_ignore_ascii_case(quote))
            .collect();
        debug!("{} pairs quoted in {}", pairs.len(), quote);
        Ok(pairs)
    }

    async fn price_history(
        &self,
        pair: &TradingPair,
        interval: Interval,
        window: TimeWindow,
    ) -> Result<PriceSeries> {
        self.klines(&pair.symbol, interval, window).await
    }
}
