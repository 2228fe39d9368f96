//! CryptoView: candlestick dashboards for exchange price history
//!
//! This crate holds everything the dashboard does apart from serving pages:
//! - [reqwest](https://docs.rs/reqwest) client for the Binance spot REST API
//! - [ta-rs](https://github.com/greyblake/ta-rs) for the moving averages
//!
//! # Features
//!
//! - **Data**: OHLCV price bars and ordered price series
//! - **Exchange**: trading pair resolution and paginated kline download
//! - **Indicators**: 10/20/50 step simple moving averages
//! - **Chart**: Plotly-compatible candlestick figures
//! - **Pipeline**: selection in, figure out
//!
//! # Example
//!
//! ```no_run
//! use cryptoview_rs::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let client = BinanceClient::new(ExchangeConfig::default())?;
//! let dashboard = Dashboard::new(client, "AUD");
//! let view = dashboard.render(&Selection::default()).await?;
//! println!("{} bars for {}", view.bar_count, view.pair.symbol);
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod data;
pub mod error;
pub mod exchange;
pub mod indicators;
pub mod pipeline;
pub mod selection;

// Re-export commonly used types
pub mod prelude {
    pub use crate::chart::*;
    pub use crate::data::*;
    pub use crate::error::*;
    pub use crate::exchange::*;
    pub use crate::indicators::*;
    pub use crate::pipeline::*;
    pub use crate::selection::*;
}

pub use error::{DashboardError, Result};
