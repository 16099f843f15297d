//! Performance metrics: pure functions over the equity curve and trade log.

use crate::domain::Trade;

/// Total return as a percentage: (final / initial - 1) * 100.
pub fn total_return_pct(initial_capital: f64, final_equity: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (final_equity / initial_capital - 1.0) * 100.0
}

/// Win rate: fraction of trades with positive net P&L. 0.0 with no trades.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Maximum drawdown as a negative fraction (e.g., -0.15 = 15% decline).
///
/// Largest peak-to-trough decline over the marked-to-market equity curve.
/// 0.0 for constant or monotonically increasing equity.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let mut peak = equity_curve[0];
    let mut max_dd = 0.0_f64;

    for &eq in equity_curve {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}
