//! Signal, the directional intent emitted by a strategy at one bar.

use serde::{Deserialize, Serialize};

/// Per-bar output of a signal strategy.
///
/// Strategies are pure: a signal describes the market opinion at one bar,
/// never a downstream position decision. Whether a Sell while Flat opens a
/// short is the simulator's call (`SimConfig::allow_short`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn is_hold(&self) -> bool {
        matches!(self, Signal::Hold)
    }
}
