//! Candlestick + moving average figure builder

use chrono::{DateTime, Utc};

use crate::chart::figure::*;
use crate::data::PriceSeries;
use crate::indicators::MovingAverageSet;
use crate::selection::Selection;

/// Colours, fonts and sizes of the dashboard chart
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub height: u32,
    pub font_family: &'static str,
    pub title_size: u32,
    pub axis_title_size: u32,
    pub tick_size: u32,
    pub increasing_color: &'static str,
    pub decreasing_color: &'static str,
    /// Line colours for the averages, in window order
    pub average_colors: Vec<&'static str>,
    pub grid_color: &'static str,
    pub background_color: &'static str,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            height: 700,
            font_family: "Times New Roman",
            title_size: 28,
            axis_title_size: 24,
            tick_size: 20,
            increasing_color: "rgb(37,202,160)",
            decreasing_color: "rgb(249,91,58)",
            average_colors: vec!["rgb(255,179,71)", "rgb(32,169,202)", "rgb(51,61,71)"],
            grid_color: "rgba(51,61,71,0.2)",
            background_color: "rgba(51,61,71,0.025)",
        }
    }
}

impl ChartStyle {
    fn average_color(&self, index: usize) -> &'static str {
        self.average_colors
            .get(index)
            .or_else(|| self.average_colors.last())
            .copied()
            .unwrap_or("rgb(51,61,71)")
    }
}

pub fn chart_title(selection: &Selection, quote: &str) -> String {
    format!(
        "{} vs {} Candlestick Chart - {}",
        selection.asset.ticker,
        quote,
        selection.interval.label()
    )
}

pub fn price_axis_title(selection: &Selection, quote: &str) -> String {
    format!("{} Price ({})", selection.asset.ticker, quote)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Build the single-panel figure for one selection.
///
/// Trace data depends only on the series and averages; the selection feeds
/// the labels and the range slider flag.
pub fn render_chart(
    selection: &Selection,
    quote: &str,
    series: &PriceSeries,
    averages: &MovingAverageSet,
    style: &ChartStyle,
) -> Figure {
    let x: Vec<String> = series.bars().iter().map(|b| format_timestamp(&b.timestamp)).collect();

    let mut data = Vec::with_capacity(1 + averages.averages().len());
    data.push(Trace::Candlestick(CandlestickTrace {
        name: "Candlestick Chart".to_string(),
        x: x.clone(),
        open: series.opens(),
        high: series.highs(),
        low: series.lows(),
        close: series.closes(),
        increasing: CandleSide {
            line: Line {
                color: style.increasing_color.to_string(),
            },
        },
        decreasing: CandleSide {
            line: Line {
                color: style.decreasing_color.to_string(),
            },
        },
    }));

    for (i, ma) in averages.averages().iter().enumerate() {
        data.push(Trace::Scatter(LineTrace {
            name: format!("{} step Moving Average", ma.window),
            mode: "lines",
            x: x.clone(),
            y: ma.values.clone(),
            line: Line {
                color: style.average_color(i).to_string(),
            },
        }));
    }

    let layout = Layout {
        autosize: true,
        height: style.height,
        title: Title {
            text: chart_title(selection, quote),
            font: Some(Font::sized(style.title_size)),
        },
        font: Font {
            family: Some(style.font_family.to_string()),
            size: None,
        },
        plot_bgcolor: style.background_color.to_string(),
        xaxis: Axis {
            title: None,
            tickfont: Font::sized(style.tick_size),
            gridcolor: style.grid_color.to_string(),
            rangeslider: Some(RangeSlider {
                visible: selection.show_range_slider,
            }),
        },
        yaxis: Axis {
            title: Some(Title {
                text: price_axis_title(selection, quote),
                font: Some(Font::sized(style.axis_title_size)),
            }),
            tickfont: Font::sized(style.tick_size),
            gridcolor: style.grid_color.to_string(),
            rangeslider: None,
        },
    };

    Figure { data, layout }
}
