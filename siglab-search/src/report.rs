//! Serializable search artifacts.

use serde::{Deserialize, Serialize};
use siglab_core::sim::BacktestResult;
use siglab_core::strategies::StrategyConfig;

use crate::target::TargetMetric;

/// One completed evaluation: the config, its backtest result, and the value
/// of the target metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRecord {
    /// Position in the generator's stream (stable across worker counts).
    pub iteration: usize,
    pub config: StrategyConfig,
    pub result: BacktestResult,
    pub fitness: f64,
}

/// One evaluation that failed and was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedEval {
    pub iteration: usize,
    pub config: StrategyConfig,
    pub error: String,
}

/// Complete outcome of one search run.
///
/// Always carries the (possibly partial) result list plus the skip count;
/// failures are recorded, never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub target_metric: TargetMetric,
    pub target_value: f64,
    /// Best-so-far by the target metric, if any evaluation completed.
    pub best: Option<EvalRecord>,
    pub records: Vec<EvalRecord>,
    pub failures: Vec<FailedEval>,
    pub evaluated: usize,
    pub skipped: usize,
    /// True when the target was met and dispatch stopped before `iterations`.
    pub early_stopped: bool,
    pub elapsed_secs: f64,
}

impl SearchOutcome {
    pub fn total_attempted(&self) -> usize {
        self.evaluated + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serialization_roundtrip() {
        let outcome = SearchOutcome {
            target_metric: TargetMetric::TotalReturn,
            target_value: 5.0,
            best: None,
            records: Vec::new(),
            failures: vec![FailedEval {
                iteration: 3,
                config: StrategyConfig::new("ma_crossover"),
                error: "insufficient data: need at least 200 bars, got 50".into(),
            }],
            evaluated: 10,
            skipped: 1,
            early_stopped: false,
            elapsed_secs: 0.25,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let deser: SearchOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(deser.total_attempted(), 11);
        assert_eq!(deser.failures.len(), 1);
        assert!(!deser.early_stopped);
    }
}
