//! Error taxonomy for the core engine.
//!
//! Three scopes:
//! - Shared-setup errors (`InvalidSeries`) are fatal and surfaced before any
//!   evaluation begins.
//! - Per-evaluation errors (`InsufficientData`, `InvalidConfig`, `Evaluation`)
//!   are caught by the optimizer and recorded as skipped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The bar series is shorter than an indicator's required lookback.
    #[error("insufficient data: need at least {required} bars, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Malformed strategy or simulator parameters.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Malformed input bar series (unsorted, duplicate timestamps, insane OHLC).
    #[error("invalid bar series: {0}")]
    InvalidSeries(String),

    /// Unexpected failure inside one strategy's simulation.
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = CoreError::InsufficientData {
            required: 21,
            actual: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 21 bars, got 10"
        );
    }

    #[test]
    fn invalid_config_message() {
        let err = CoreError::InvalidConfig("commission_rate must be >= 0".into());
        assert!(err.to_string().contains("commission_rate"));
    }
}
