//! MACD line vs signal line crossover.
//!
//! Buy when the MACD line crosses above its signal line, Sell when it crosses
//! below.

use crate::domain::{Bar, Signal};
use crate::indicators::{Indicator, IndicatorSet, Macd, MacdSignal};

use super::SignalStrategy;

#[derive(Debug, Clone)]
pub struct MacdCross {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
    macd_key: String,
    signal_key: String,
}

impl MacdCross {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(fast_period >= 1, "fast_period must be >= 1");
        assert!(
            slow_period > fast_period,
            "slow_period must be > fast_period"
        );
        assert!(signal_period >= 1, "signal_period must be >= 1");
        Self {
            fast_period,
            slow_period,
            signal_period,
            macd_key: format!("macd_{fast_period}_{slow_period}"),
            signal_key: format!("macd_signal_{fast_period}_{slow_period}_{signal_period}"),
        }
    }
}

impl SignalStrategy for MacdCross {
    fn name(&self) -> &str {
        "macd_cross"
    }

    fn warmup_bars(&self) -> usize {
        // Signal line lookback plus one bar for cross detection.
        self.slow_period + self.signal_period - 1
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Macd::new(self.fast_period, self.slow_period)),
            Box::new(MacdSignal::new(
                self.fast_period,
                self.slow_period,
                self.signal_period,
            )),
        ]
    }

    fn evaluate(&self, _bars: &[Bar], bar_index: usize, set: &IndicatorSet) -> Signal {
        if bar_index == 0 || bar_index < self.warmup_bars() {
            return Signal::Hold;
        }

        let (macd_cur, sig_cur, macd_prev, sig_prev) = match (
            set.get(&self.macd_key, bar_index),
            set.get(&self.signal_key, bar_index),
            set.get(&self.macd_key, bar_index - 1),
            set.get(&self.signal_key, bar_index - 1),
        ) {
            (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
            _ => return Signal::Hold,
        };
        if macd_cur.is_nan() || sig_cur.is_nan() || macd_prev.is_nan() || sig_prev.is_nan() {
            return Signal::Hold;
        }

        if macd_cur > sig_cur && macd_prev <= sig_prev {
            Signal::Buy
        } else if macd_cur < sig_cur && macd_prev >= sig_prev {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}
