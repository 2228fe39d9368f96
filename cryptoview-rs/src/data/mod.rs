//! Price data module
//!
//! OHLCV bars as delivered by the exchange, and the ordered series one
//! selection produces.

pub mod bar;

pub use bar::*;
