//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Four series per (period, multiplier), as separate Indicator instances:
//! - Middle: SMA(close, period)
//! - Upper / Lower: middle +/- mult * stddev(close, period)
//! - PercentB: (close - lower) / (upper - lower), the normalized band
//!   position (0 = lower band, 1 = upper band); 0.5 when the bands collapse.
//!
//! Uses population stddev (divide by N), maintained with rolling sum and
//! sum-of-squares so the whole series is one pass.
//! Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::Indicator;

/// Which series of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
    PercentB,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn make(period: usize, multiplier: f64, band: BollingerBand, tag: &str) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        assert!(multiplier > 0.0, "Bollinger multiplier must be > 0");
        Self {
            period,
            multiplier,
            band,
            name: format!("bb_{tag}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::make(period, multiplier, BollingerBand::Upper, "upper")
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::make(period, multiplier, BollingerBand::Middle, "middle")
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::make(period, multiplier, BollingerBand::Lower, "lower")
    }

    pub fn percent_b(period: usize, multiplier: f64) -> Self {
        Self::make(period, multiplier, BollingerBand::PercentB, "pctb")
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let p = self.period as f64;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for bar in bars.iter().take(self.period) {
            sum += bar.close;
            sum_sq += bar.close * bar.close;
        }

        for i in (self.period - 1)..n {
            if i >= self.period {
                let leaving = bars[i - self.period].close;
                let entering = bars[i].close;
                sum += entering - leaving;
                sum_sq += entering * entering - leaving * leaving;
            }

            let mean = sum / p;
            // Population variance; clamp tiny negatives from cancellation.
            let variance = (sum_sq / p - mean * mean).max(0.0);
            let stddev = variance.sqrt();
            let upper = mean + self.multiplier * stddev;
            let lower = mean - self.multiplier * stddev;

            result[i] = match self.band {
                BollingerBand::Middle => mean,
                BollingerBand::Upper => upper,
                BollingerBand::Lower => lower,
                BollingerBand::PercentB => {
                    if upper == lower {
                        0.5
                    } else {
                        (bars[i].close - lower) / (upper - lower)
                    }
                }
            };
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bollinger_middle_is_sma() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Bollinger::middle(3, 2.0).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let middle = Bollinger::middle(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);

        for i in 2..5 {
            let half_width = upper[i] - middle[i];
            assert_approx(middle[i] - lower[i], half_width, 1e-9);
        }
    }

    #[test]
    fn bollinger_matches_direct_computation() {
        let closes = [10.0, 14.0, 9.0, 16.0, 12.0, 11.0, 15.0];
        let bars = make_bars(&closes);
        let upper = Bollinger::upper(4, 2.0).compute(&bars);

        for i in 3..closes.len() {
            let window = &closes[i - 3..=i];
            let mean: f64 = window.iter().sum::<f64>() / 4.0;
            let var: f64 = window.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / 4.0;
            assert_approx(upper[i], mean + 2.0 * var.sqrt(), 1e-9);
        }
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);

        // Constant price: stddev = 0, bands collapse to SMA
        assert_approx(upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(lower[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn percent_b_band_position() {
        let bars = make_bars(&[10.0, 14.0, 9.0, 16.0, 12.0]);
        let pctb = Bollinger::percent_b(3, 2.0).compute(&bars);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        for i in 2..5 {
            let expected = (bars[i].close - lower[i]) / (upper[i] - lower[i]);
            assert_approx(pctb[i], expected, 1e-9);
        }
    }

    #[test]
    fn percent_b_collapsed_bands() {
        let bars = make_bars(&[100.0, 100.0, 100.0]);
        let pctb = Bollinger::percent_b(3, 2.0).compute(&bars);
        assert_approx(pctb[2], 0.5, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
    }
}
