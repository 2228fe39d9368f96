//! Binance REST payloads

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::data::PriceBar;
use crate::exchange::TradingPair;
use crate::{DashboardError, Result};

#[derive(Debug, Deserialize)]
pub(crate) struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
}

impl SymbolInfo {
    pub fn is_trading(&self) -> bool {
        self.status == "TRADING"
    }
}

impl From<SymbolInfo> for TradingPair {
    fn from(info: SymbolInfo) -> Self {
        Self {
            symbol: info.symbol,
            base_asset: info.base_asset,
            quote_asset: info.quote_asset,
        }
    }
}

/// Error body Binance sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

/// Parse one kline row.
///
/// Rows are mixed-type arrays:
/// `[open_time, "open", "high", "low", "close", "volume", close_time, ...]`.
pub(crate) fn parse_kline(row: &[Value]) -> Result<PriceBar> {
    if row.len() < 6 {
        return Err(DashboardError::Decode(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let open_time = row[0]
        .as_i64()
        .ok_or_else(|| DashboardError::Decode(format!("bad kline open time: {}", row[0])))?;
    let timestamp = DateTime::from_timestamp_millis(open_time)
        .ok_or_else(|| DashboardError::Decode(format!("kline open time out of range: {}", open_time)))?;

    Ok(PriceBar::new(
        timestamp,
        price_field(&row[1], "open")?,
        price_field(&row[2], "high")?,
        price_field(&row[3], "low")?,
        price_field(&row[4], "close")?,
        price_field(&row[5], "volume")?,
    ))
}

fn price_field(value: &Value, name: &str) -> Result<f64> {
    let parsed = match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| DashboardError::Decode(format!("bad kline {} field: {}", name, value)))
}
