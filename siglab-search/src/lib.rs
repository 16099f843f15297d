//! SigLab Search: randomized strategy search over the core engine.
//!
//! - `generator`: weighted, bounded, seed-deterministic config sampling
//! - `optimizer`: batched parallel evaluation with early stop
//! - `target`: the metric being optimized
//! - `report`: serializable search artifacts

pub mod generator;
pub mod optimizer;
pub mod report;
pub mod target;

pub use generator::{FamilyPool, FamilyVariant, ParamRange, StrategyGenerator};
pub use optimizer::{ParallelOptimizer, SearchConfig, SearchError};
pub use report::{EvalRecord, FailedEval, SearchOutcome};
pub use target::TargetMetric;
