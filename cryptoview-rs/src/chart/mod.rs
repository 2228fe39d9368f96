//! Chart module
//!
//! Builds candlestick figures with moving average overlays. Figures serialize
//! to the JSON shape plotly.js takes for `Plotly.react(el, data, layout)`.

pub mod figure;
pub mod render;

pub use figure::*;
pub use render::*;
