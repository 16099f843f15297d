//! Consensus voting strategy.
//!
//! Six independent voters (MA-cross state, RSI, MACD state, stochastic,
//! Williams %R, MFI) each cast Buy/Sell/Hold. The overall signal is Buy when
//! buy-votes reach `min_signals` and outnumber sell-votes, Sell on the
//! symmetric condition, otherwise Hold; a buy/sell tie is Hold.
//!
//! A low `min_signals` relative to the roster deliberately raises trade
//! frequency and noise sensitivity; it is a tuning knob, not a defect.

use crate::domain::{Bar, Signal};
use crate::indicators::{
    Ema, Indicator, IndicatorSet, Macd, MacdSignal, Mfi, Rsi, Stochastic, WilliamsR,
};

use super::SignalStrategy;

/// Number of voters in the roster.
pub const VOTER_COUNT: usize = 6;

#[derive(Debug, Clone)]
pub struct Consensus {
    pub min_signals: usize,
    pub ma_fast: usize,
    pub ma_slow: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub stoch_period: usize,
    pub willr_period: usize,
    pub mfi_period: usize,
    /// Oscillator band on the 0-100 scale; Williams %R uses `oversold - 100`.
    pub oversold: f64,
    pub overbought: f64,
}

impl Consensus {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        min_signals: usize,
        ma_fast: usize,
        ma_slow: usize,
        rsi_period: usize,
        macd_fast: usize,
        macd_slow: usize,
        macd_signal: usize,
        stoch_period: usize,
        willr_period: usize,
        mfi_period: usize,
        oversold: f64,
        overbought: f64,
    ) -> Self {
        assert!(
            (1..=VOTER_COUNT).contains(&min_signals),
            "min_signals must be in 1..={VOTER_COUNT}"
        );
        assert!(ma_slow > ma_fast, "ma_slow must be > ma_fast");
        assert!(macd_slow > macd_fast, "macd_slow must be > macd_fast");
        assert!(oversold < overbought, "oversold must be < overbought");
        Self {
            min_signals,
            ma_fast,
            ma_slow,
            rsi_period,
            macd_fast,
            macd_slow,
            macd_signal,
            stoch_period,
            willr_period,
            mfi_period,
            oversold,
            overbought,
        }
    }

    fn value(&self, set: &IndicatorSet, key: &str, i: usize) -> Option<f64> {
        set.get(key, i).filter(|v| !v.is_nan())
    }

    /// One oscillator vote on the 0-100 scale.
    fn band_vote(&self, value: Option<f64>) -> Signal {
        match value {
            Some(v) if v < self.oversold => Signal::Buy,
            Some(v) if v > self.overbought => Signal::Sell,
            _ => Signal::Hold,
        }
    }

    fn votes(&self, set: &IndicatorSet, i: usize) -> [Signal; VOTER_COUNT] {
        // MA trend state
        let ma_vote = match (
            self.value(set, &format!("ema_{}", self.ma_fast), i),
            self.value(set, &format!("ema_{}", self.ma_slow), i),
        ) {
            (Some(fast), Some(slow)) if fast > slow => Signal::Buy,
            (Some(fast), Some(slow)) if fast < slow => Signal::Sell,
            _ => Signal::Hold,
        };

        // MACD state
        let macd_vote = match (
            self.value(set, &format!("macd_{}_{}", self.macd_fast, self.macd_slow), i),
            self.value(
                set,
                &format!(
                    "macd_signal_{}_{}_{}",
                    self.macd_fast, self.macd_slow, self.macd_signal
                ),
                i,
            ),
        ) {
            (Some(line), Some(sig)) if line > sig => Signal::Buy,
            (Some(line), Some(sig)) if line < sig => Signal::Sell,
            _ => Signal::Hold,
        };

        let rsi_vote = self.band_vote(self.value(set, &format!("rsi_{}", self.rsi_period), i));
        let stoch_vote =
            self.band_vote(self.value(set, &format!("stoch_{}", self.stoch_period), i));
        let mfi_vote = self.band_vote(self.value(set, &format!("mfi_{}", self.mfi_period), i));

        // Williams %R lives on [-100, 0]; shift the shared bands down.
        let willr_vote = match self.value(set, &format!("willr_{}", self.willr_period), i) {
            Some(v) if v < self.oversold - 100.0 => Signal::Buy,
            Some(v) if v > self.overbought - 100.0 => Signal::Sell,
            _ => Signal::Hold,
        };

        [
            ma_vote, rsi_vote, macd_vote, stoch_vote, willr_vote, mfi_vote,
        ]
    }
}

impl SignalStrategy for Consensus {
    fn name(&self) -> &str {
        "consensus"
    }

    fn warmup_bars(&self) -> usize {
        [
            self.ma_slow,
            self.rsi_period + 1,
            self.macd_slow + self.macd_signal - 1,
            self.stoch_period,
            self.willr_period,
            self.mfi_period + 1,
        ]
        .into_iter()
        .max()
        .unwrap()
    }

    fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Ema::new(self.ma_fast)),
            Box::new(Ema::new(self.ma_slow)),
            Box::new(Rsi::new(self.rsi_period)),
            Box::new(Macd::new(self.macd_fast, self.macd_slow)),
            Box::new(MacdSignal::new(
                self.macd_fast,
                self.macd_slow,
                self.macd_signal,
            )),
            Box::new(Stochastic::new(self.stoch_period)),
            Box::new(WilliamsR::new(self.willr_period)),
            Box::new(Mfi::new(self.mfi_period)),
        ]
    }

    fn evaluate(&self, _bars: &[Bar], bar_index: usize, set: &IndicatorSet) -> Signal {
        if bar_index < self.warmup_bars() {
            return Signal::Hold;
        }

        let votes = self.votes(set, bar_index);
        let buy = votes.iter().filter(|v| **v == Signal::Buy).count();
        let sell = votes.iter().filter(|v| **v == Signal::Sell).count();

        // Tie (buy == sell) falls through to Hold.
        if buy >= self.min_signals && buy > sell {
            Signal::Buy
        } else if sell >= self.min_signals && sell > buy {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}
