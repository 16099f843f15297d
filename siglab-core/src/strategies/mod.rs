//! Signal strategies: pure per-bar Buy/Sell/Hold decisions.
//!
//! A strategy is a pure function of precomputed indicator values and a bar
//! index. No side effects, no I/O, and never any portfolio state; whether a
//! signal opens, closes, or reverses a position is the simulator's concern.

pub mod bollinger_reversion;
pub mod config;
pub mod consensus;
pub mod factory;
pub mod ma_crossover;
pub mod macd_cross;
pub mod rsi_reversal;
pub mod volume_breakout;

pub use bollinger_reversion::BollingerReversion;
pub use config::StrategyConfig;
pub use consensus::Consensus;
pub use factory::create_strategy;
pub use ma_crossover::{MaCrossover, MaType};
pub use macd_cross::MacdCross;
pub use rsi_reversal::RsiReversal;
pub use volume_breakout::VolumeBreakout;

use crate::domain::{Bar, Signal};
use crate::indicators::{Indicator, IndicatorSet};

/// Trait for signal strategies.
///
/// # Architecture invariant
/// `evaluate` receives only bar history and precomputed indicator values; the
/// signature has no position or equity parameter, so a strategy cannot peek at
/// portfolio state. The implementation must only use data from
/// `bars[0..=bar_index]`.
pub trait SignalStrategy: Send + Sync {
    /// Family name (e.g., "ma_crossover").
    fn name(&self) -> &str;

    /// Number of bars needed before this strategy can emit a non-Hold signal.
    fn warmup_bars(&self) -> usize;

    /// The indicator instances this strategy reads, for precomputation.
    fn indicators(&self) -> Vec<Box<dyn Indicator>>;

    /// Evaluate the strategy at `bar_index`. Returns `Signal::Hold` during
    /// warm-up or whenever a required indicator value is undefined.
    fn evaluate(&self, bars: &[Bar], bar_index: usize, set: &IndicatorSet) -> Signal;
}
