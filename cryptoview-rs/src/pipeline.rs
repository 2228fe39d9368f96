//! Selection in, figure out: fetch → moving averages → chart.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::chart::{render_chart, ChartStyle, Figure};
use crate::data::PriceSeries;
use crate::exchange::{resolve_pair, MarketData, TimeWindow, TradingPair};
use crate::indicators::MovingAverageSet;
use crate::selection::Selection;
use crate::Result;

/// Everything the page needs to show for one selection
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub selection: Selection,
    pub pair: TradingPair,
    pub bar_count: usize,
    pub figure: Figure,
    /// Non-fatal conditions, e.g. too few bars for a moving average
    pub warnings: Vec<String>,
}

/// Render pipeline over one market data source, priced in one quote currency.
#[derive(Debug)]
pub struct Dashboard<S> {
    source: S,
    quote: String,
    style: ChartStyle,
}

impl<S: MarketData> Dashboard<S> {
    pub fn new(source: S, quote: impl Into<String>) -> Self {
        Self {
            source,
            quote: quote.into(),
            style: ChartStyle::default(),
        }
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve the selected asset to a pair and download its bars for the
    /// trailing day range ending at `now`.
    pub async fn fetch(
        &self,
        selection: &Selection,
        now: DateTime<Utc>,
    ) -> Result<(TradingPair, PriceSeries)> {
        let pairs = self.source.trading_pairs(&self.quote).await?;
        let pair = resolve_pair(&pairs, selection.asset.ticker, &self.quote)?;

        let window = TimeWindow::trailing(now, selection.day_range.duration());
        let series = self
            .source
            .price_history(&pair, selection.interval, window)
            .await?;
        Ok((pair, series))
    }

    pub async fn render(&self, selection: &Selection) -> Result<ChartView> {
        self.render_at(selection, Utc::now()).await
    }

    pub async fn render_at(&self, selection: &Selection, now: DateTime<Utc>) -> Result<ChartView> {
        let (pair, series) = self.fetch(selection, now).await?;
        let view = build_view(selection, &self.quote, pair, &series, &self.style);
        info!(
            "Rendered {} {} over {}: {} bars",
            view.pair.symbol,
            selection.interval,
            selection.day_range.label(),
            view.bar_count
        );
        Ok(view)
    }
}

/// Pure half of the pipeline: averages and figure for an already fetched series.
pub fn build_view(
    selection: &Selection,
    quote: &str,
    pair: TradingPair,
    series: &PriceSeries,
    style: &ChartStyle,
) -> ChartView {
    let averages = MovingAverageSet::compute(series);

    let warnings: Vec<String> = averages
        .missing_windows()
        .into_iter()
        .map(|window| {
            format!(
                "only {} bars returned, {} step moving average needs {}",
                series.len(),
                window,
                window
            )
        })
        .collect();
    for warning in &warnings {
        warn!("{}: {}", pair.symbol, warning);
    }

    ChartView {
        selection: *selection,
        bar_count: series.len(),
        figure: render_chart(selection, quote, series, &averages, style),
        pair,
        warnings,
    }
}
