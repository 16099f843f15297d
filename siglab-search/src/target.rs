//! Target metric: which result statistic the search optimizes.

use serde::{Deserialize, Serialize};
use siglab_core::sim::BacktestResult;

/// The metric to optimize and early-stop on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMetric {
    /// Total return percentage. A `target_value` of 5.0 means +5%.
    #[default]
    TotalReturn,
    FinalEquity,
    WinRate,
    /// Negative fraction: -0.05 is a 5% drawdown. A `target_value` of -0.10
    /// is met by any drawdown shallower than 10%.
    MaxDrawdown,
}

impl TargetMetric {
    /// Extract the metric value from a result.
    pub fn extract(&self, result: &BacktestResult) -> f64 {
        match self {
            Self::TotalReturn => result.total_return_pct,
            Self::FinalEquity => result.final_equity,
            Self::WinRate => result.win_rate,
            Self::MaxDrawdown => result.max_drawdown,
        }
    }

    /// True when `a` is better than `b`.
    ///
    /// Higher is better for every metric including MaxDrawdown, where
    /// -0.05 > -0.20 means the shallower drawdown wins.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        a > b
    }

    /// True when `value` meets or exceeds the early-stop target.
    pub fn meets(&self, value: f64, target: f64) -> bool {
        value >= target
    }
}
