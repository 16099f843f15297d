//! MACD (Moving Average Convergence/Divergence).
//!
//! Two instances per parameter triple (the per-band pattern used by the
//! multi-series indicators):
//! - `Macd`: EMA(fast) - EMA(slow). Lookback: slow_period - 1.
//! - `MacdSignal`: EMA(signal_period) of the MACD line.
//!   Lookback: slow_period + signal_period - 2.

use crate::domain::Bar;
use crate::indicators::ema::ema_of_series;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    name: String,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        assert!(fast_period >= 1, "MACD fast_period must be >= 1");
        assert!(
            slow_period > fast_period,
            "MACD slow_period must be > fast_period"
        );
        Self {
            fast_period,
            slow_period,
            name: format!("macd_{fast_period}_{slow_period}"),
        }
    }

    fn line(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast_period);
        let slow = ema_of_series(&closes, self.slow_period);
        fast.iter()
            .zip(&slow)
            .map(|(f, s)| {
                if f.is_nan() || s.is_nan() {
                    f64::NAN
                } else {
                    f - s
                }
            })
            .collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow_period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        self.line(bars)
    }
}

/// Signal line: EMA of the MACD line.
#[derive(Debug, Clone)]
pub struct MacdSignal {
    macd: Macd,
    signal_period: usize,
    name: String,
}

impl MacdSignal {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(signal_period >= 1, "MACD signal_period must be >= 1");
        Self {
            macd: Macd::new(fast_period, slow_period),
            signal_period,
            name: format!("macd_signal_{fast_period}_{slow_period}_{signal_period}"),
        }
    }
}

impl Indicator for MacdSignal {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.macd.lookback() + self.signal_period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&self.macd.line(bars), self.signal_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn macd_warmup_prefix() {
        let bars = make_bars(&(0..40).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let macd = Macd::new(12, 26);
        let result = macd.compute(&bars);
        for i in 0..25 {
            assert!(result[i].is_nan(), "expected NaN at {i}");
        }
        assert!(!result[25].is_nan());
    }

    #[test]
    fn macd_positive_in_uptrend() {
        // Accelerating uptrend: fast EMA above slow EMA.
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let bars = make_bars(&closes);
        let result = Macd::new(5, 15).compute(&bars);
        assert!(result[59] > 0.0, "MACD should be positive, got {}", result[59]);
    }

    #[test]
    fn macd_negative_in_downtrend() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 0.99f64.powi(i)).collect();
        let bars = make_bars(&closes);
        let result = Macd::new(5, 15).compute(&bars);
        assert!(result[59] < 0.0);
    }

    #[test]
    fn macd_zero_on_constant_price() {
        let bars = make_bars(&[100.0; 40]);
        let result = Macd::new(5, 15).compute(&bars);
        assert_approx(result[39], 0.0, 1e-9);
    }

    #[test]
    fn signal_line_lags_macd_line() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.35).sin() * 10.0 + i as f64 * 0.1)
            .collect();
        let bars = make_bars(&closes);
        let macd = Macd::new(5, 15).compute(&bars);
        let signal = MacdSignal::new(5, 15, 4).compute(&bars);

        // First valid signal value appears after the combined lookback.
        let lb = MacdSignal::new(5, 15, 4).lookback();
        assert!(signal[lb - 1].is_nan());
        assert!(!signal[lb].is_nan());
        // Signal is a smoothing of macd: its swings are no larger.
        let macd_range = macd[lb..]
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let sig_range = signal[lb..]
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        assert!(sig_range.1 - sig_range.0 <= macd_range.1 - macd_range.0 + 1e-9);
    }

    #[test]
    fn lookbacks() {
        assert_eq!(Macd::new(12, 26).lookback(), 25);
        assert_eq!(MacdSignal::new(12, 26, 9).lookback(), 33);
    }

    #[test]
    #[should_panic(expected = "slow_period must be > fast_period")]
    fn rejects_slow_leq_fast() {
        Macd::new(26, 12);
    }
}
