//! Moving average crossover: golden cross and death cross detection.
//!
//! Buy when the fast MA crosses above the slow MA, Sell when it crosses
//! below, Hold otherwise. At the first bar where both averages are defined
//! there is no prior state to cross from; the strategy enters the prevailing
//! trend instead (fast already above slow reads as Buy), so a trend that
//! formed during warm-up is not missed.

use crate::domain::{Bar, Signal};
use crate::indicators::{Ema, Indicator, IndicatorSet, Sma};

use super::SignalStrategy;

/// Moving average type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    Sma,
    Ema,
}

impl MaType {
    fn prefix(&self) -> &'static str {
        match self {
            MaType::Sma => "sma",
            MaType::Ema => "ema",
        }
    }
}

/// # Indicator dependencies
/// Two precomputed MA series: `{ma_type}_{fast_period}` and
/// `{ma_type}_{slow_period}`.
#[derive(Debug, Clone)]
pub struct MaCrossover {
    pub fast_period: usize,
    pub slow_period: usize,
    pub ma_type: MaType,
    fast_key: String,
    slow_key: String,
}

impl MaCrossover {
    pub fn new(fast_period: usize, slow_period: usize, ma_type: MaType) -> Self {
        assert!(fast_period >= 1, "fast_period must be >= 1");
        assert!(
            slow_period > fast_period,
            "slow_period must be > fast_period"
        );

        let prefix = ma_type.prefix();
        Self {
            fast_period,
            slow_period,
            ma_type,
            fast_key: format!("{prefix}_{fast_period}"),
            slow_key: format!("{prefix}_{slow_period}"),
        }
    }
}

impl SignalStrategy for MaCrossover {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn warmup_bars(&self) -> usize {
        self.slow_period - 1
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        match self.ma_type {
            MaType::Sma => vec![
                Box::new(Sma::new(self.fast_period)),
                Box::new(Sma::new(self.slow_period)),
            ],
            MaType::Ema => vec![
                Box::new(Ema::new(self.fast_period)),
                Box::new(Ema::new(self.slow_period)),
            ],
        }
    }

    fn evaluate(&self, _bars: &[Bar], bar_index: usize, set: &IndicatorSet) -> Signal {
        if bar_index < self.warmup_bars() {
            return Signal::Hold;
        }

        let (fast_cur, slow_cur) = match (
            set.get(&self.fast_key, bar_index),
            set.get(&self.slow_key, bar_index),
        ) {
            (Some(f), Some(s)) if !f.is_nan() && !s.is_nan() => (f, s),
            _ => return Signal::Hold,
        };

        let prev = if bar_index == 0 {
            None
        } else {
            match (
                set.get(&self.fast_key, bar_index - 1),
                set.get(&self.slow_key, bar_index - 1),
            ) {
                (Some(f), Some(s)) if !f.is_nan() && !s.is_nan() => Some((f, s)),
                _ => None,
            }
        };

        match prev {
            Some((fast_prev, slow_prev)) => {
                if fast_cur > slow_cur && fast_prev <= slow_prev {
                    Signal::Buy
                } else if fast_cur < slow_cur && fast_prev >= slow_prev {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
            // First defined bar: enter the prevailing trend.
            None => {
                if fast_cur > slow_cur {
                    Signal::Buy
                } else if fast_cur < slow_cur {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn make_set(fast: Vec<f64>, slow: Vec<f64>) -> IndicatorSet {
        let mut set = IndicatorSet::new();
        set.insert("sma_10", fast);
        set.insert("sma_50", slow);
        set
    }

    fn flat_bars(n: usize) -> Vec<Bar> {
        make_bars(&vec![100.0; n])
    }

    #[test]
    fn fires_buy_on_golden_cross() {
        let n = 60;
        let bars = flat_bars(n);
        let mut fast = vec![95.0; n];
        let slow = vec![100.0; n];
        for v in fast.iter_mut().skip(52) {
            *v = 105.0;
        }
        let set = make_set(fast, slow);
        let strat = MaCrossover::new(10, 50, MaType::Sma);

        assert_eq!(strat.evaluate(&bars, 52, &set), Signal::Buy);
        // No re-fire while the trend continues.
        assert_eq!(strat.evaluate(&bars, 53, &set), Signal::Hold);
    }

    #[test]
    fn fires_sell_on_death_cross() {
        let n = 60;
        let bars = flat_bars(n);
        let mut fast = vec![105.0; n];
        let slow = vec![100.0; n];
        for v in fast.iter_mut().skip(52) {
            *v = 95.0;
        }
        let set = make_set(fast, slow);
        let strat = MaCrossover::new(10, 50, MaType::Sma);

        assert_eq!(strat.evaluate(&bars, 52, &set), Signal::Sell);
    }

    #[test]
    fn holds_during_warmup() {
        let n = 60;
        let bars = flat_bars(n);
        let set = make_set(vec![105.0; n], vec![100.0; n]);
        let strat = MaCrossover::new(10, 50, MaType::Sma);
        assert_eq!(strat.evaluate(&bars, 0, &set), Signal::Hold);
        assert_eq!(strat.evaluate(&bars, 49, &set), Signal::Hold);
    }

    #[test]
    fn holds_on_nan_current_values() {
        let n = 60;
        let bars = flat_bars(n);
        let mut fast = vec![95.0; n];
        fast[52] = f64::NAN;
        let set = make_set(fast, vec![100.0; n]);
        let strat = MaCrossover::new(10, 50, MaType::Sma);
        assert_eq!(strat.evaluate(&bars, 52, &set), Signal::Hold);
    }

    #[test]
    fn enters_prevailing_trend_on_first_defined_bar() {
        // Both series undefined until index 49, fast above slow from there:
        // the first defined bar reads as Buy even without a strict cross.
        let n = 60;
        let bars = flat_bars(n);
        let mut fast = vec![f64::NAN; n];
        let mut slow = vec![f64::NAN; n];
        for i in 49..n {
            fast[i] = 105.0;
            slow[i] = 100.0;
        }
        let set = make_set(fast, slow);
        let strat = MaCrossover::new(10, 50, MaType::Sma);
        assert_eq!(strat.evaluate(&bars, 49, &set), Signal::Buy);
        // Established trend afterwards: no re-fire.
        assert_eq!(strat.evaluate(&bars, 50, &set), Signal::Hold);
    }

    #[test]
    fn holds_on_missing_series() {
        let bars = flat_bars(60);
        let set = IndicatorSet::new();
        let strat = MaCrossover::new(10, 50, MaType::Sma);
        assert_eq!(strat.evaluate(&bars, 52, &set), Signal::Hold);
    }

    #[test]
    fn ema_variant_uses_ema_keys() {
        let strat = MaCrossover::new(12, 26, MaType::Ema);
        let names: Vec<String> = strat
            .indicators()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert!(names.contains(&"ema_12".to_string()));
        assert!(names.contains(&"ema_26".to_string()));
    }

    #[test]
    #[should_panic(expected = "slow_period must be > fast_period")]
    fn rejects_slow_leq_fast() {
        MaCrossover::new(50, 10, MaType::Sma);
    }
}
