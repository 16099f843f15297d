//! Volume moving average.
//!
//! Rolling mean of volume, used for breakout confirmation (a breakout on
//! above-average volume is the tradeable one).
//! Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct VolumeSma {
    period: usize,
    name: String,
}

impl VolumeSma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume SMA period must be >= 1");
        Self {
            period,
            name: format!("vol_sma_{period}"),
        }
    }
}

impl Indicator for VolumeSma {
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

        let mut sum: f64 = bars.iter().take(self.period).map(|b| b.volume as f64).sum();
        result[self.period - 1] = sum / self.period as f64;

        for i in self.period..n {
            sum += bars[i].volume as f64 - bars[i - self.period].volume as f64;
            result[i] = sum / self.period as f64;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars_with_volume, DEFAULT_EPSILON};

    #[test]
    fn volume_sma_basic() {
        let bars = make_bars_with_volume(&[
            (100.0, 1000),
            (100.0, 2000),
            (100.0, 3000),
            (100.0, 4000),
        ]);
        let result = VolumeSma::new(3).compute(&bars);

        assert!(result[1].is_nan());
        assert_approx(result[2], 2000.0, DEFAULT_EPSILON);
        assert_approx(result[3], 3000.0, DEFAULT_EPSILON);
    }

    #[test]
    fn volume_sma_lookback() {
        assert_eq!(VolumeSma::new(20).lookback(), 19);
    }
}
