//! Position state owned by one simulator run.

use serde::{Deserialize, Serialize};

/// Direction of an open position or a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

/// An open position: entry price, entry bar, size, and the commission already
/// paid on entry (realized against the trade at close).
///
/// Exclusively owned by one `TradeSimulator` for the duration of one run.
#[derive(Debug, Clone)]
pub struct OpenPosition {
    pub direction: Direction,
    pub entry_price: f64,
    pub entry_bar: usize,
    pub quantity: f64,
    pub entry_commission: f64,
}

impl OpenPosition {
    /// Unrealized P&L at the given price, before exit commission.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.direction {
            Direction::Long => self.quantity * (price - self.entry_price),
            Direction::Short => self.quantity * (self.entry_price - price),
        }
    }
}
