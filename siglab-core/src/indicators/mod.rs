//! Indicator layer: single-pass series computations and the memoizing cache.
//!
//! Every indicator implements the `Indicator` trait and produces an output
//! series aligned 1:1 with the input bars, with `f64::NAN` for the warm-up
//! prefix. Computation is rolling or recursive, never a per-bar window rescan.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per band, keeping the single-series `Indicator` trait unchanged.

pub mod adx;
pub mod bollinger;
pub mod cache;
pub mod ema;
pub mod macd;
pub mod mfi;
pub mod obv;
pub mod roc;
pub mod rolling_extrema;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volume_sma;
pub mod wilder;
pub mod williams_r;

pub use adx::Adx;
pub use bollinger::{Bollinger, BollingerBand};
pub use cache::IndicatorCache;
pub use ema::Ema;
pub use macd::{Macd, MacdSignal};
pub use mfi::Mfi;
pub use obv::Obv;
pub use roc::Roc;
pub use rolling_extrema::{RollingHigh, RollingLow};
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::Stochastic;
pub use volume_sma::VolumeSma;
pub use wilder::Atr;
pub use williams_r::WilliamsR;

use crate::domain::Bar;
use std::collections::HashMap;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. The first `lookback()` values are `f64::NAN` (warm-up).
///
/// # Causality
/// No indicator value at bar t may depend on price data from bar t+1 or
/// later. Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Series name (e.g., "sma_20", "rsi_14"). Doubles as the cache key
    /// within an `IndicatorSet`, so it must encode every parameter.
    fn name(&self) -> &str;

    /// Number of bars consumed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Immutable container of precomputed indicator series.
///
/// Built once per (bar series, parameter set), then queried by bar index.
/// Never mutated after creation; shared across workers as `Arc<IndicatorSet>`.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Value of a named indicator at a bar index. `None` for a missing series
    /// or out-of-range index; `Some(NaN)` inside the warm-up prefix.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Like `make_bars` but with explicit per-bar volume.
#[cfg(test)]
pub fn make_bars_with_volume(data: &[(f64, u64)]) -> Vec<Bar> {
    let closes: Vec<f64> = data.iter().map(|&(c, _)| c).collect();
    let mut bars = make_bars(&closes);
    for (bar, &(_, volume)) in bars.iter_mut().zip(data) {
        bar.volume = volume;
    }
    bars
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
