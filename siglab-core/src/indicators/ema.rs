//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
    }
}

/// Compute EMA over a raw f64 slice.
///
/// Used by composed indicators (MACD, ADX signal paths) that need an EMA of
/// an arbitrary series, including one that starts with a NaN warm-up prefix:
/// the seed window begins at the first non-NaN value.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 {
        return result;
    }

    let start = match values.iter().position(|v| !v.is_nan()) {
        Some(s) => s,
        None => return result,
    };
    if n - start < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let seed: f64 = values[start..start + period].iter().sum::<f64>() / period as f64;
    let seed_index = start + period - 1;
    result[seed_index] = seed;

    let mut prev = seed;
    for i in (seed_index + 1)..n {
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
