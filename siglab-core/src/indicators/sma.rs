//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window, maintained by a
//! running sum (one add and one subtract per bar).
//! Lookback: period - 1 (first valid value at index period-1).

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let mut sum: f64 = bars.iter().take(self.period).map(|b| b.close).sum();
        result[self.period - 1] = sum / self.period as f64;

        for i in self.period..n {
            sum += bars[i].close - bars[i - self.period].close;
            result[i] = sum / self.period as f64;
        }

        result
    }
}
