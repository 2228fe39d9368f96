//! The 10/20/50 step moving averages drawn over the candlesticks

use serde::Serialize;

use crate::data::PriceSeries;
use crate::indicators::simple_moving_average;

/// Window sizes drawn on every chart, shortest first.
pub const MA_WINDOWS: [usize; 3] = [10, 20, 50];

/// One moving average aligned index-for-index with its series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverage {
    pub window: usize,
    pub values: Vec<Option<f64>>,
}

impl MovingAverage {
    pub fn compute(series: &PriceSeries, window: usize) -> Self {
        Self {
            window,
            values: simple_moving_average(&series.closes(), window),
        }
    }

    /// Number of positions with a value: `len - window + 1`, or 0.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn label(&self) -> String {
        format!("MA{}", self.window)
    }
}

/// MA10, MA20 and MA50 over the closing prices of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSet {
    averages: Vec<MovingAverage>,
}

impl MovingAverageSet {
    pub fn compute(series: &PriceSeries) -> Self {
        Self::with_windows(series, &MA_WINDOWS)
    }

    pub fn with_windows(series: &PriceSeries, windows: &[usize]) -> Self {
        Self {
            averages: windows
                .iter()
                .map(|&window| MovingAverage::compute(series, window))
                .collect(),
        }
    }

    pub fn averages(&self) -> &[MovingAverage] {
        &self.averages
    }

    pub fn get(&self, window: usize) -> Option<&MovingAverage> {
        self.averages.iter().find(|ma| ma.window == window)
    }

    /// Windows the series was too short to fill even once.
    pub fn missing_windows(&self) -> Vec<usize> {
        self.averages
            .iter()
            .filter(|ma| ma.defined_count() == 0)
            .map(|ma| ma.window)
            .collect()
    }
}
