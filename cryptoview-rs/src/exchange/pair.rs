//! Trading pairs and ticker resolution

use serde::Serialize;

use crate::{DashboardError, Result};

/// An exchange-tradable (base, quote) combination, e.g. BTC/AUD
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradingPair {
    /// Exchange symbol, e.g. "BTCAUD"
    pub symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
}

impl TradingPair {
    pub fn new(symbol: &str, base_asset: &str, quote_asset: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            base_asset: base_asset.to_string(),
            quote_asset: quote_asset.to_string(),
        }
    }
}

/// Pick the pair for `ticker` among `pairs` quoted in `quote`.
///
/// An exact base asset match wins. Otherwise the first pair whose base asset
/// contains the ticker is used, so listings with prefixed base assets
/// (e.g. "1000SHIB") still resolve.
pub fn resolve_pair(pairs: &[TradingPair], ticker: &str, quote: &str) -> Result<TradingPair> {
    let quoted = || {
        pairs
            .iter()
            .filter(move |p| p.quote_asset.eq_ignore_ascii_case(quote))
    };

    quoted()
        .find(|p| p.base_asset.eq_ignore_ascii_case(ticker))
        .or_else(|| {
            let needle = ticker.to_ascii_uppercase();
            quoted().find(|p| p.base_asset.to_ascii_uppercase().contains(&needle))
        })
        .cloned()
        .ok_or_else(|| DashboardError::SymbolNotFound {
            ticker: ticker.to_string(),
            quote: quote.to_string(),
        })
}
