//! Exchange integration module
//!
//! Binance spot REST client plus the [`MarketData`] seam the render pipeline
//! fetches through.

pub mod client;
pub mod pair;
mod wire;

pub use client::*;
pub use pair::*;

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::data::PriceSeries;
use crate::selection::Interval;
use crate::Result;

/// Half-open time window `[start, end)` a price history request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// The trailing `lookback` ending at `end`.
    pub fn trailing(end: DateTime<Utc>, lookback: chrono::Duration) -> Self {
        Self {
            start: end - lookback,
            end,
        }
    }
}

/// Source of trading pairs and historical bars.
pub trait MarketData: Send + Sync {
    /// All pairs currently trading against `quote`.
    fn trading_pairs(&self, quote: &str) -> impl Future<Output = Result<Vec<TradingPair>>> + Send;

    /// Bars for `pair` at `interval` opening inside `window`, oldest first.
    fn price_history(
        &self,
        pair: &TradingPair,
        interval: Interval,
        window: TimeWindow,
    ) -> impl Future<Output = Result<PriceSeries>> + Send;
}
