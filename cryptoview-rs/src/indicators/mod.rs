//! Technical indicators module
//!
//! Provides the moving averages drawn over the candlesticks, using the `ta` crate.

pub mod moving_average;
pub mod sma;

pub use moving_average::*;
pub use sma::*;

/// Indicator trait for all indicators
pub trait Indicator {
    /// Get the name of the indicator
    fn name(&self) -> &str;

    /// Update indicator with new value
    fn update(&mut self, value: f64);

    /// Get current indicator value
    fn value(&self) -> Option<f64>;

    /// Check if indicator is ready (has enough data)
    fn is_ready(&self) -> bool;
}
