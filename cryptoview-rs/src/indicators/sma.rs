//! SMA (Simple Moving Average) indicator

use crate::indicators::Indicator;
use ta::indicators::SimpleMovingAverage;
use ta::Next;

/// SMA indicator wrapper
///
/// `ta` averages over however many values it has seen so far; this wrapper
/// withholds the value until a full window has been observed.
#[derive(Debug)]
pub struct Sma {
    inner: SimpleMovingAverage,
    period: usize,
    update_count: usize,
    last_value: Option<f64>,
}

impl Sma {
    /// Create new SMA indicator. Returns `None` for a zero period.
    pub fn new(period: usize) -> Option<Self> {
        let inner = SimpleMovingAverage::new(period).ok()?;
        Some(Self {
            inner,
            period,
            update_count: 0,
            last_value: None,
        })
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        "SMA"
    }

    fn update(&mut self, value: f64) {
        let sma_value = self.inner.next(value);
        self.update_count += 1;
        if self.update_count >= self.period {
            self.last_value = Some(sma_value);
        }
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.update_count >= self.period
    }
}

/// Trailing mean of `window` values at each index, absent until the window fills.
///
/// A zero window never fills, so every position is absent.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let Some(mut sma) = Sma::new(window) else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .map(|&value| {
            sma.update(value);
            sma.value()
        })
        .collect()
}
