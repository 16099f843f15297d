//! RSI reversal: buy exits from oversold, sell exits from overbought.
//!
//! Buy when RSI crosses up through the oversold band (prior bar below, current
//! bar at or above); Sell on the symmetric cross down through overbought.
//! Waiting for the cross rather than the raw level avoids selling into a
//! still-falling market.

use crate::domain::{Bar, Signal};
use crate::indicators::{Indicator, IndicatorSet, Rsi};

use super::SignalStrategy;

#[derive(Debug, Clone)]
pub struct RsiReversal {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
    key: String,
}

impl RsiReversal {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        assert!(period >= 1, "period must be >= 1");
        assert!(
            oversold < overbought,
            "oversold must be < overbought"
        );
        Self {
            period,
            oversold,
            overbought,
            key: format!("rsi_{period}"),
        }
    }
}

impl SignalStrategy for RsiReversal {
    fn name(&self) -> &str {
        "rsi_reversal"
    }

    fn warmup_bars(&self) -> usize {
        self.period + 1
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Rsi::new(self.period))]
    }

    fn evaluate(&self, _bars: &[Bar], bar_index: usize, set: &IndicatorSet) -> Signal {
        if bar_index < self.warmup_bars() {
            return Signal::Hold;
        }

        let (cur, prev) = match (
            set.get(&self.key, bar_index),
            set.get(&self.key, bar_index - 1),
        ) {
            (Some(c), Some(p)) => (c, p),
            _ => return Signal::Hold,
        };
        if cur.is_nan() || prev.is_nan() {
            return Signal::Hold;
        }

        if prev < self.oversold && cur >= self.oversold {
            Signal::Buy
        } else if prev > self.overbought && cur <= self.overbought {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}
