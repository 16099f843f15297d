//! Factory: converts a `StrategyConfig` into a runtime strategy object.
//!
//! The factory is the validation boundary for sampled and deserialized
//! configs: unknown families and malformed parameters surface as
//! `InvalidConfig` here, so constructors can keep plain asserts.

use crate::error::CoreError;
use crate::strategies::{
    BollingerReversion, Consensus, MaCrossover, MaType, MacdCross, RsiReversal, SignalStrategy,
    StrategyConfig, VolumeBreakout,
};

use super::consensus::VOTER_COUNT;

/// Extract a named f64 parameter, falling back to `default`.
fn param(config: &StrategyConfig, name: &str, default: f64) -> f64 {
    config.params.get(name).copied().unwrap_or(default)
}

/// Extract a named usize parameter, falling back to `default`.
fn param_usize(config: &StrategyConfig, name: &str, default: usize) -> usize {
    config
        .params
        .get(name)
        .copied()
        .map(|v| v as usize)
        .unwrap_or(default)
}

fn require_order(fast: usize, slow: usize, what: &str) -> Result<(), CoreError> {
    if fast < 1 {
        return Err(CoreError::InvalidConfig(format!(
            "{what}: fast period must be >= 1, got {fast}"
        )));
    }
    if slow <= fast {
        return Err(CoreError::InvalidConfig(format!(
            "{what}: slow period ({slow}) must be > fast period ({fast})"
        )));
    }
    Ok(())
}

fn require_min_period(period: usize, min: usize, what: &str) -> Result<(), CoreError> {
    if period < min {
        return Err(CoreError::InvalidConfig(format!(
            "{what}: period must be >= {min}, got {period}"
        )));
    }
    Ok(())
}

fn require_bands(oversold: f64, overbought: f64, what: &str) -> Result<(), CoreError> {
    if oversold >= overbought {
        return Err(CoreError::InvalidConfig(format!(
            "{what}: oversold ({oversold}) must be < overbought ({overbought})"
        )));
    }
    Ok(())
}

/// Create a signal strategy from a `StrategyConfig`.
pub fn create_strategy(config: &StrategyConfig) -> Result<Box<dyn SignalStrategy>, CoreError> {
    match config.family.as_str() {
        "ma_crossover" => {
            let fast = param_usize(config, "fast_period", 10);
            let slow = param_usize(config, "slow_period", 50);
            require_order(fast, slow, "ma_crossover")?;
            let ma_type = if param(config, "ma_type", 0.0) == 1.0 {
                MaType::Ema
            } else {
                MaType::Sma
            };
            Ok(Box::new(MaCrossover::new(fast, slow, ma_type)))
        }
        "rsi_reversal" => {
            let period = param_usize(config, "period", 14);
            let oversold = param(config, "oversold", 30.0);
            let overbought = param(config, "overbought", 70.0);
            require_min_period(period, 1, "rsi_reversal")?;
            require_bands(oversold, overbought, "rsi_reversal")?;
            Ok(Box::new(RsiReversal::new(period, oversold, overbought)))
        }
        "macd_cross" => {
            let fast = param_usize(config, "fast_period", 12);
            let slow = param_usize(config, "slow_period", 26);
            let signal = param_usize(config, "signal_period", 9);
            require_order(fast, slow, "macd_cross")?;
            require_min_period(signal, 1, "macd_cross signal")?;
            Ok(Box::new(MacdCross::new(fast, slow, signal)))
        }
        "bollinger_reversion" => {
            let period = param_usize(config, "period", 20);
            let multiplier = param(config, "multiplier", 2.0);
            require_min_period(period, 2, "bollinger_reversion")?;
            if multiplier <= 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "bollinger_reversion: multiplier must be > 0, got {multiplier}"
                )));
            }
            Ok(Box::new(BollingerReversion::new(period, multiplier)))
        }
        "volume_breakout" => {
            let breakout = param_usize(config, "breakout_period", 20);
            let volume = param_usize(config, "volume_period", 20);
            let mult = param(config, "volume_mult", 1.5);
            let exit = param_usize(config, "exit_period", 10);
            require_min_period(breakout, 1, "volume_breakout breakout")?;
            require_min_period(volume, 1, "volume_breakout volume")?;
            require_min_period(exit, 1, "volume_breakout exit")?;
            if mult <= 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "volume_breakout: volume_mult must be > 0, got {mult}"
                )));
            }
            Ok(Box::new(VolumeBreakout::new(breakout, volume, mult, exit)))
        }
        "consensus" => {
            let min_signals = param_usize(config, "min_signals", 3);
            if !(1..=VOTER_COUNT).contains(&min_signals) {
                return Err(CoreError::InvalidConfig(format!(
                    "consensus: min_signals must be in 1..={VOTER_COUNT}, got {min_signals}"
                )));
            }
            let ma_fast = param_usize(config, "ma_fast", 10);
            let ma_slow = param_usize(config, "ma_slow", 30);
            require_order(ma_fast, ma_slow, "consensus ma")?;
            let macd_fast = param_usize(config, "macd_fast", 12);
            let macd_slow = param_usize(config, "macd_slow", 26);
            require_order(macd_fast, macd_slow, "consensus macd")?;
            let oversold = param(config, "oversold", 30.0);
            let overbought = param(config, "overbought", 70.0);
            require_bands(oversold, overbought, "consensus")?;
            Ok(Box::new(Consensus::new(
                min_signals,
                ma_fast,
                ma_slow,
                param_usize(config, "rsi_period", 14),
                macd_fast,
                macd_slow,
                param_usize(config, "macd_signal", 9),
                param_usize(config, "stoch_period", 14),
                param_usize(config, "willr_period", 14),
                param_usize(config, "mfi_period", 14),
                oversold,
                overbought,
            )))
        }
        other => Err(CoreError::InvalidConfig(format!(
            "unknown strategy family: {other}"
        ))),
    }
}
