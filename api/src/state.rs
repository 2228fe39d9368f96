use std::sync::Arc;

use chrono::{DateTime, Utc};
use cryptoview_rs::exchange::{BinanceClient, ExchangeConfig, MarketData};
use cryptoview_rs::pipeline::Dashboard;
use shared::Config;

use crate::gate::RenderGate;

/// Everything the running dashboard shares between requests. Built once in
/// `main` and handed to the router.
pub struct AppContext<S> {
    pub dashboard: Dashboard<S>,
    pub gate: RenderGate,
    pub started_at: DateTime<Utc>,
}

impl<S: MarketData> AppContext<S> {
    pub fn new(source: S, quote_currency: &str) -> Arc<Self> {
        Arc::new(Self {
            dashboard: Dashboard::new(source, quote_currency),
            gate: RenderGate::new(),
            started_at: Utc::now(),
        })
    }

    pub fn quote_currency(&self) -> &str {
        self.dashboard.quote()
    }
}

impl AppContext<BinanceClient> {
    pub fn from_config(config: &Config) -> Result<Arc<Self>, anyhow::Error> {
        let client = BinanceClient::new(ExchangeConfig {
            base_url: config.binance_base_url.clone(),
            api_key: config.binance_api_key.clone(),
            api_secret: config.binance_api_secret.clone(),
            timeout_secs: config.http_timeout_secs,
            ..ExchangeConfig::default()
        })?;
        Ok(Self::new(client, &config.quote_currency))
    }
}
