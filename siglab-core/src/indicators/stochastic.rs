//! Stochastic oscillator (%K).
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low)
//! over a rolling high/low window.
//! Flat window (high == low) -> 50.
//! Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::rolling_extrema::rolling_extremum;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    name: String,
}

impl Stochastic {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "stochastic period must be >= 1");
        Self {
            period,
            name: format!("stoch_{period}"),
        }
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let hh = rolling_extremum(&highs, self.period, |a, b| a >= b);
        let ll = rolling_extremum(&lows, self.period, |a, b| a <= b);

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                if hh[i].is_nan() || ll[i].is_nan() {
                    f64::NAN
                } else if hh[i] == ll[i] {
                    50.0
                } else {
                    100.0 * (bar.close - ll[i]) / (hh[i] - ll[i])
                }
            })
            .collect()
    }
}
