//! Plotly figure model

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn range_slider_visible(&self) -> bool {
        self.layout
            .xaxis
            .rangeslider
            .as_ref()
            .map(|r| r.visible)
            .unwrap_or(false)
    }

    pub fn candlestick(&self) -> Option<&CandlestickTrace> {
        self.data.iter().find_map(|t| match t {
            Trace::Candlestick(c) => Some(c),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineTrace> {
        self.data.iter().filter_map(|t| match t {
            Trace::Scatter(l) => Some(l),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick(CandlestickTrace),
    Scatter(LineTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickTrace {
    pub name: String,
    pub x: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub increasing: CandleSide,
    pub decreasing: CandleSide,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSide {
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<String>,
    /// `None` serializes as `null`, which plotly leaves as a gap.
    pub y: Vec<Option<f64>>,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub autosize: bool,
    pub height: u32,
    pub title: Title,
    pub font: Font,
    pub plot_bgcolor: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl Font {
    pub fn sized(size: u32) -> Self {
        Self {
            family: None,
            size: Some(size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    pub tickfont: Font,
    pub gridcolor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}
