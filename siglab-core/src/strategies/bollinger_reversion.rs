//! Bollinger band mean reversion on the normalized band position.
//!
//! %B below 0 means the close is under the lower band: Buy. %B above 1 means
//! it is over the upper band: Sell. Anywhere inside the bands: Hold.

use crate::domain::{Bar, Signal};
use crate::indicators::{Bollinger, Indicator, IndicatorSet};

use super::SignalStrategy;

#[derive(Debug, Clone)]
pub struct BollingerReversion {
    pub period: usize,
    pub multiplier: f64,
    key: String,
}

impl BollingerReversion {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 2, "period must be >= 2");
        assert!(multiplier > 0.0, "multiplier must be > 0");
        Self {
            period,
            multiplier,
            key: format!("bb_pctb_{period}_{multiplier}"),
        }
    }
}

impl SignalStrategy for BollingerReversion {
    fn name(&self) -> &str {
        "bollinger_reversion"
    }

    fn warmup_bars(&self) -> usize {
        self.period - 1
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Bollinger::percent_b(self.period, self.multiplier))]
    }

    fn evaluate(&self, _bars: &[Bar], bar_index: usize, set: &IndicatorSet) -> Signal {
        if bar_index < self.warmup_bars() {
            return Signal::Hold;
        }

        let pctb = match set.get(&self.key, bar_index) {
            Some(v) if !v.is_nan() => v,
            _ => return Signal::Hold,
        };

        if pctb < 0.0 {
            Signal::Buy
        } else if pctb > 1.0 {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}
