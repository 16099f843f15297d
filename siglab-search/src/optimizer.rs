//! Parallel randomized optimizer.
//!
//! Evaluates generated strategy configurations against one bar series on a
//! fixed Rayon worker pool. Work is dispatched in batches of a few multiples
//! of the worker count; after each batch the best-so-far is updated and the
//! early-stop target checked. Once any completed evaluation meets the target,
//! no further batch is dispatched; the in-flight batch finishes rather than
//! being killed. Cancellation is the same cooperative batch-boundary check.
//!
//! A single evaluation's failure (e.g. a lookback longer than the series) is
//! caught, recorded as skipped, and never aborts the batch. Only shared-setup
//! failures (a malformed bar series, an invalid config) are fatal and surface
//! before any evaluation begins.
//!
//! Shared state across workers is the read-only bar slice and the indicator
//! cache, whose entries are immutable once written. Each evaluation owns its
//! simulator state, so tasks need no synchronization.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use siglab_core::domain::{validate_series, Bar};
use siglab_core::indicators::IndicatorCache;
use siglab_core::sim::{SimConfig, TradeSimulator};
use siglab_core::strategies::{create_strategy, StrategyConfig};
use siglab_core::CoreError;

use crate::generator::{FamilyPool, StrategyGenerator};
use crate::report::{EvalRecord, FailedEval, SearchOutcome};
use crate::target::TargetMetric;

/// Errors from the optimizer.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search config: {0}")]
    Config(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("failed to build worker pool: {0}")]
    Pool(String),
}

/// Search configuration, validated at construction of the optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of configurations to evaluate (upper bound; early stop may end
    /// the run sooner).
    pub iterations: usize,
    pub target_metric: TargetMetric,
    pub target_value: f64,
    pub workers: usize,
    pub seed: u64,
    pub sim: SimConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            target_metric: TargetMetric::TotalReturn,
            target_value: 5.0,
            workers: 4,
            seed: 42,
            sim: SimConfig::default(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<(), SearchError> {
        if self.iterations == 0 {
            return Err(SearchError::Config("iterations must be >= 1".into()));
        }
        if self.workers == 0 {
            return Err(SearchError::Config("workers must be >= 1".into()));
        }
        self.sim.validate()?;
        Ok(())
    }
}

/// Fans (config, simulator) pairs across a worker pool and tracks the best
/// result by the target metric.
pub struct ParallelOptimizer {
    config: SearchConfig,
    pool: FamilyPool,
}

impl ParallelOptimizer {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            config,
            pool: FamilyPool::default_pool(),
        })
    }

    /// Restrict or reweight the family pool (tests plant known configs this
    /// way; embedding callers can bias exploration).
    pub fn with_pool(mut self, pool: FamilyPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search. Blocks the caller until the iteration budget is
    /// exhausted, the target is met, or `cancel` is raised.
    pub fn run(
        &self,
        bars: &[Bar],
        cancel: Option<&AtomicBool>,
    ) -> Result<SearchOutcome, SearchError> {
        // Shared-setup validation is fatal before any evaluation begins.
        validate_series(bars)?;
        let simulator = TradeSimulator::new(self.config.sim.clone())?;

        let started = Instant::now();
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| SearchError::Pool(e.to_string()))?;

        let cache = IndicatorCache::new();
        let mut generator = StrategyGenerator::new(self.pool.clone(), self.config.seed);
        let target = self.config.target_metric;

        let mut records: Vec<EvalRecord> = Vec::new();
        let mut failures: Vec<FailedEval> = Vec::new();
        let mut best: Option<EvalRecord> = None;
        let mut early_stopped = false;
        let mut dispatched = 0usize;

        let batch_size = self.config.workers.saturating_mul(4).max(1);

        while dispatched < self.config.iterations && !early_stopped {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break;
            }

            let remaining = self.config.iterations - dispatched;
            let batch: Vec<(usize, StrategyConfig)> = (&mut generator)
                .take(remaining.min(batch_size))
                .enumerate()
                .map(|(offset, config)| (dispatched + offset, config))
                .collect();
            dispatched += batch.len();

            let batch_results: Vec<(usize, StrategyConfig, Result<EvalRecord, CoreError>)> =
                thread_pool.install(|| {
                    batch
                        .into_par_iter()
                        .map(|(iteration, config)| {
                            let outcome =
                                evaluate_one(bars, &config, &simulator, &cache, target, iteration);
                            (iteration, config, outcome)
                        })
                        .collect()
                });

            for (iteration, config, outcome) in batch_results {
                match outcome {
                    Ok(record) => {
                        let is_better = best
                            .as_ref()
                            .map(|b| target.is_better(record.fitness, b.fitness))
                            .unwrap_or(true);
                        if is_better {
                            best = Some(record.clone());
                        }
                        records.push(record);
                    }
                    Err(err) => failures.push(FailedEval {
                        iteration,
                        config,
                        error: err.to_string(),
                    }),
                }
            }

            if let Some(ref record) = best {
                if target.meets(record.fitness, self.config.target_value) {
                    early_stopped = dispatched < self.config.iterations;
                    break;
                }
            }
        }

        Ok(SearchOutcome {
            target_metric: target,
            target_value: self.config.target_value,
            best,
            evaluated: records.len(),
            skipped: failures.len(),
            records,
            failures,
            early_stopped,
            elapsed_secs: started.elapsed().as_secs_f64(),
        })
    }
}

/// Evaluate one configuration: build the strategy, fetch (or compute) its
/// indicator set through the shared cache, and run an isolated simulation.
fn evaluate_one(
    bars: &[Bar],
    config: &StrategyConfig,
    simulator: &TradeSimulator,
    cache: &IndicatorCache,
    target: TargetMetric,
    iteration: usize,
) -> Result<EvalRecord, CoreError> {
    let strategy = create_strategy(config)?;
    let set = cache.compute(bars, &strategy.indicators())?;
    let result = simulator.run(bars, strategy.as_ref(), &set)?;
    let fitness = target.extract(&result);
    Ok(EvalRecord {
        iteration,
        config: config.clone(),
        result,
        fitness,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_iterations_rejected() {
        let config = SearchConfig {
            iterations: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(
            ParallelOptimizer::new(config),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn zero_workers_rejected() {
        let config = SearchConfig {
            workers: 0,
            ..SearchConfig::default()
        };
        assert!(ParallelOptimizer::new(config).is_err());
    }

    #[test]
    fn invalid_sim_config_rejected() {
        let config = SearchConfig {
            sim: SimConfig {
                initial_capital: -5.0,
                ..SimConfig::default()
            },
            ..SearchConfig::default()
        };
        assert!(ParallelOptimizer::new(config).is_err());
    }
}
