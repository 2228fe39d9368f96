use std::fmt;

use anyhow::{ensure, Context};
use dotenv::dotenv;

/// Process-wide settings, read once at startup.
pub struct Config {
    pub binance_api_key: Option<String>,
    pub binance_api_secret: Option<String>,
    pub binance_base_url: String,
    /// Currency every chart is priced in, e.g. "AUD"
    pub quote_currency: String,
    pub bind_addr: String,
    pub http_timeout_secs: u64,
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        let config = Config {
            binance_api_key: env_opt("BINANCE_API_KEY"),
            binance_api_secret: env_opt("BINANCE_API_SECRET"),
            binance_base_url: env_opt("BINANCE_BASE_URL")
                .unwrap_or_else(|| "https://api.binance.com".to_string()),
            quote_currency: env_opt("QUOTE_CURRENCY")
                .unwrap_or_else(|| "AUD".to_string())
                .to_uppercase(),
            bind_addr: env_opt("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8050".to_string()),
            http_timeout_secs: env_opt("HTTP_TIMEOUT_SECS")
                .map(|s| s.parse())
                .transpose()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?
                .unwrap_or(15),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        ensure!(
            !self.quote_currency.is_empty()
                && self.quote_currency.chars().all(|c| c.is_ascii_alphanumeric()),
            "QUOTE_CURRENCY must be an asset code like AUD, got {:?}",
            self.quote_currency
        );
        ensure!(self.http_timeout_secs > 0, "HTTP_TIMEOUT_SECS must be positive");
        ensure!(
            self.binance_base_url.starts_with("http://") || self.binance_base_url.starts_with("https://"),
            "BINANCE_BASE_URL must be an http(s) URL"
        );
        if self.binance_api_secret.is_some() && self.binance_api_key.is_none() {
            tracing::warn!("BINANCE_API_SECRET is set without BINANCE_API_KEY");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binance_api_key: None,
            binance_api_secret: None,
            binance_base_url: "https://api.binance.com".to_string(),
            quote_currency: "AUD".to_string(),
            bind_addr: "0.0.0.0:8050".to_string(),
            http_timeout_secs: 15,
        }
    }
}

// Credentials stay out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("binance_api_key", &self.binance_api_key.as_ref().map(|_| "<redacted>"))
            .field("binance_api_secret", &self.binance_api_secret.as_ref().map(|_| "<redacted>"))
            .field("binance_base_url", &self.binance_base_url)
            .field("quote_currency", &self.quote_currency)
            .field("bind_addr", &self.bind_addr)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}
