//! Williams %R.
//!
//! %R = -100 * (highest_high - close) / (highest_high - lowest_low)
//! over a rolling high/low window. Range: [-100, 0], higher = stronger.
//! Flat window -> -50.
//! Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::rolling_extrema::rolling_extremum;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
    name: String,
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Williams %R period must be >= 1");
        Self {
            period,
            name: format!("willr_{period}"),
        }
    }
}

impl Indicator for WilliamsR {
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
                    -50.0
                } else {
                    -100.0 * (hh[i] - bar.close) / (hh[i] - ll[i])
                }
            })
            .collect()
    }
}
