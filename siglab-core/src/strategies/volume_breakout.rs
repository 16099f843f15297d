//! Rolling-high breakout with volume confirmation.
//!
//! Buy when the close exceeds the previous bar's rolling high AND volume runs
//! above `volume_mult` times its moving average; the volume gate filters out
//! thin breakouts. Sell when the close drops below the exit moving average.
//!
//! The breakout reference is the rolling high as of the previous bar: the
//! current bar's own high would contain the breakout itself.

use crate::domain::{Bar, Signal};
use crate::indicators::{Indicator, IndicatorSet, RollingHigh, Sma, VolumeSma};

use super::SignalStrategy;

#[derive(Debug, Clone)]
pub struct VolumeBreakout {
    pub breakout_period: usize,
    pub volume_period: usize,
    pub volume_mult: f64,
    pub exit_period: usize,
    high_key: String,
    vol_key: String,
    exit_key: String,
}

impl VolumeBreakout {
    pub fn new(
        breakout_period: usize,
        volume_period: usize,
        volume_mult: f64,
        exit_period: usize,
    ) -> Self {
        assert!(breakout_period >= 1, "breakout_period must be >= 1");
        assert!(volume_period >= 1, "volume_period must be >= 1");
        assert!(volume_mult > 0.0, "volume_mult must be > 0");
        assert!(exit_period >= 1, "exit_period must be >= 1");
        Self {
            breakout_period,
            volume_period,
            volume_mult,
            exit_period,
            high_key: format!("hh_{breakout_period}"),
            vol_key: format!("vol_sma_{volume_period}"),
            exit_key: format!("sma_{exit_period}"),
        }
    }
}

impl SignalStrategy for VolumeBreakout {
    fn name(&self) -> &str {
        "volume_breakout"
    }

    fn warmup_bars(&self) -> usize {
        self.breakout_period
            .max(self.volume_period)
            .max(self.exit_period)
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(RollingHigh::new(self.breakout_period)),
            Box::new(VolumeSma::new(self.volume_period)),
            Box::new(Sma::new(self.exit_period)),
        ]
    }

    fn evaluate(&self, bars: &[Bar], bar_index: usize, set: &IndicatorSet) -> Signal {
        if bar_index == 0 || bar_index < self.warmup_bars() {
            return Signal::Hold;
        }

        let bar = &bars[bar_index];

        let prior_high = match set.get(&self.high_key, bar_index - 1) {
            Some(v) if !v.is_nan() => v,
            _ => return Signal::Hold,
        };
        let avg_volume = match set.get(&self.vol_key, bar_index - 1) {
            Some(v) if !v.is_nan() => v,
            _ => return Signal::Hold,
        };
        let exit_ma = match set.get(&self.exit_key, bar_index) {
            Some(v) if !v.is_nan() => v,
            _ => return Signal::Hold,
        };

        if bar.close > prior_high && bar.volume as f64 > self.volume_mult * avg_volume {
            Signal::Buy
        } else if bar.close < exit_ma {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}
