//! Trade, a completed round trip from entry to exit.

use serde::{Deserialize, Serialize};

use super::position::Direction;

/// A closed-position record. Appended to the trade log in close order and
/// immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub direction: Direction,

    pub entry_bar: usize,
    pub entry_price: f64,
    pub exit_bar: usize,
    pub exit_price: f64,

    pub quantity: f64,

    /// P&L before commissions.
    pub gross_pnl: f64,
    /// Entry commission + exit commission.
    pub commission: f64,
    /// `gross_pnl - commission`.
    pub net_pnl: f64,

    pub bars_held: usize,

    /// Set on the synthetic trade created by the end-of-series force close.
    pub forced: bool,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.net_pnl > 0.0
    }

    /// Return on the trade as a fraction of entry notional.
    pub fn return_pct(&self) -> f64 {
        let notional = self.entry_price * self.quantity;
        if notional == 0.0 {
            return 0.0;
        }
        self.net_pnl / notional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade() -> Trade {
        Trade {
            direction: Direction::Long,
            entry_bar: 4,
            entry_price: 100.0,
            exit_bar: 8,
            exit_price: 110.0,
            quantity: 50.0,
            gross_pnl: 500.0,
            commission: 10.5,
            net_pnl: 489.5,
            bars_held: 4,
            forced: false,
        }
    }

    #[test]
    fn winner_and_return() {
        let trade = sample_trade();
        assert!(trade.is_winner());
        assert!((trade.return_pct() - 489.5 / 5000.0).abs() < 1e-12);
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
