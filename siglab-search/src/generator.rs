//! Randomized strategy generator.
//!
//! Samples `StrategyConfig` values from a weighted family pool: the family is
//! a weighted categorical draw, each parameter is drawn within documented
//! per-family bounds (log-uniform for periods, uniform for thresholds), and
//! cross-parameter ordering invariants are repaired after sampling so every
//! emitted config passes the factory.
//!
//! The sequence is lazy, conceptually infinite, restartable, and
//! seed-deterministic: the same seed replays the same config stream.

use rand::rngs::StdRng;
use rand::Rng;
use siglab_core::rng::RngHierarchy;
use siglab_core::strategies::StrategyConfig;

/// Bounds for one numeric parameter.
#[derive(Debug, Clone)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    /// Sample on a log scale (periods span orders of magnitude).
    pub log_uniform: bool,
    /// Round to the nearest integer after sampling (periods, counts, flags).
    pub round: bool,
}

impl ParamRange {
    fn period(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            log_uniform: true,
            round: true,
        }
    }

    fn uniform(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            log_uniform: false,
            round: false,
        }
    }

    fn discrete(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            min,
            max,
            log_uniform: false,
            round: true,
        }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let value = if self.log_uniform {
            let lo = self.min.ln();
            let hi = self.max.ln();
            (lo + rng.gen::<f64>() * (hi - lo)).exp()
        } else {
            self.min + rng.gen::<f64>() * (self.max - self.min)
        };
        let value = if self.round { value.round() } else { value };
        value.clamp(self.min, self.max)
    }
}

/// A strategy family with its selection weight and parameter bounds.
#[derive(Debug, Clone)]
pub struct FamilyVariant {
    pub family: &'static str,
    /// Weight for selection (higher = more likely to be picked).
    pub weight: f64,
    pub ranges: Vec<ParamRange>,
}

/// Pool of all families available to the search.
#[derive(Debug, Clone)]
pub struct FamilyPool {
    pub variants: Vec<FamilyVariant>,
}

impl FamilyPool {
    /// Default pool: all six families, trend-followers weighted up.
    pub fn default_pool() -> Self {
        Self {
            variants: vec![
                FamilyVariant {
                    family: "ma_crossover",
                    weight: 2.0,
                    ranges: vec![
                        ParamRange::period("fast_period", 5.0, 30.0),
                        ParamRange::period("slow_period", 20.0, 200.0),
                        ParamRange::discrete("ma_type", 0.0, 1.0),
                    ],
                },
                FamilyVariant {
                    family: "rsi_reversal",
                    weight: 2.0,
                    ranges: vec![
                        ParamRange::period("period", 5.0, 30.0),
                        ParamRange::uniform("oversold", 15.0, 40.0),
                        ParamRange::uniform("overbought", 60.0, 85.0),
                    ],
                },
                FamilyVariant {
                    family: "macd_cross",
                    weight: 1.5,
                    ranges: vec![
                        ParamRange::period("fast_period", 5.0, 20.0),
                        ParamRange::period("slow_period", 20.0, 60.0),
                        ParamRange::period("signal_period", 3.0, 15.0),
                    ],
                },
                FamilyVariant {
                    family: "bollinger_reversion",
                    weight: 1.5,
                    ranges: vec![
                        ParamRange::period("period", 10.0, 50.0),
                        ParamRange::uniform("multiplier", 1.0, 3.0),
                    ],
                },
                FamilyVariant {
                    family: "volume_breakout",
                    weight: 1.0,
                    ranges: vec![
                        ParamRange::period("breakout_period", 10.0, 100.0),
                        ParamRange::period("volume_period", 10.0, 50.0),
                        ParamRange::uniform("volume_mult", 1.2, 3.0),
                        ParamRange::period("exit_period", 5.0, 30.0),
                    ],
                },
                FamilyVariant {
                    family: "consensus",
                    weight: 1.0,
                    ranges: vec![
                        ParamRange::discrete("min_signals", 1.0, 6.0),
                        ParamRange::period("ma_fast", 5.0, 20.0),
                        ParamRange::period("ma_slow", 20.0, 60.0),
                        ParamRange::period("rsi_period", 7.0, 21.0),
                        ParamRange::period("macd_fast", 8.0, 16.0),
                        ParamRange::period("macd_slow", 20.0, 35.0),
                        ParamRange::period("macd_signal", 5.0, 12.0),
                        ParamRange::period("stoch_period", 7.0, 21.0),
                        ParamRange::period("willr_period", 7.0, 21.0),
                        ParamRange::period("mfi_period", 7.0, 21.0),
                        ParamRange::uniform("oversold", 20.0, 35.0),
                        ParamRange::uniform("overbought", 65.0, 80.0),
                    ],
                },
            ],
        }
    }
}

fn weighted_select<'a, R: Rng>(rng: &mut R, variants: &'a [FamilyVariant]) -> &'a FamilyVariant {
    let total_weight: f64 = variants.iter().map(|v| v.weight).sum();
    let mut pick = rng.gen::<f64>() * total_weight;
    for variant in variants {
        pick -= variant.weight;
        if pick <= 0.0 {
            return variant;
        }
    }
    variants.last().expect("pool is never empty")
}

/// Repair cross-parameter ordering invariants the factory asserts on:
/// fast < slow period pairs and oversold < overbought bands.
fn fix_cross_param_constraints(mut config: StrategyConfig) -> StrategyConfig {
    for (fast_key, slow_key) in [
        ("fast_period", "slow_period"),
        ("ma_fast", "ma_slow"),
        ("macd_fast", "macd_slow"),
    ] {
        let fast = config.params.get(fast_key).copied();
        let slow = config.params.get(slow_key).copied();
        if let (Some(fast), Some(slow)) = (fast, slow) {
            if slow <= fast {
                let new_fast = slow.min(fast);
                let new_slow = slow.max(fast) + 1.0;
                config.params.insert(fast_key.into(), new_fast);
                config.params.insert(slow_key.into(), new_slow);
            }
        }
    }

    let oversold = config.params.get("oversold").copied();
    let overbought = config.params.get("overbought").copied();
    if let (Some(lo), Some(hi)) = (oversold, overbought) {
        if hi <= lo {
            config.params.insert("oversold".into(), hi.min(lo));
            config.params.insert("overbought".into(), hi.max(lo) + 1.0);
        }
    }

    config
}

/// Lazy, seed-deterministic stream of strategy configurations.
///
/// Implements `Iterator` and never ends; the optimizer bounds it by count.
/// Recreating a generator with the same seed restarts the identical stream.
#[derive(Debug)]
pub struct StrategyGenerator {
    pool: FamilyPool,
    rng: StdRng,
}

impl StrategyGenerator {
    pub fn new(pool: FamilyPool, seed: u64) -> Self {
        assert!(!pool.variants.is_empty(), "family pool must be non-empty");
        // Derive the sampling stream through the hierarchy so the generator
        // label is isolated from any other consumer of the master seed.
        let rng = RngHierarchy::new(seed).rng_for("generator", 0);
        Self { pool, rng }
    }

    pub fn with_default_pool(seed: u64) -> Self {
        Self::new(FamilyPool::default_pool(), seed)
    }

    fn sample(&mut self) -> StrategyConfig {
        let variant = weighted_select(&mut self.rng, &self.pool.variants);
        let mut config = StrategyConfig::new(variant.family);
        for range in &variant.ranges {
            let value = range.sample(&mut self.rng);
            config.params.insert(range.name.to_string(), value);
        }
        fix_cross_param_constraints(config)
    }
}

impl Iterator for StrategyGenerator {
    type Item = StrategyConfig;

    fn next(&mut self) -> Option<StrategyConfig> {
        Some(self.sample())
    }
}
