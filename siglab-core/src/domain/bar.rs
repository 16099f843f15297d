//! Bar, the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One OHLCV sample for a fixed time slot.
///
/// Indicators operate on bar index, not wall-clock time, so irregular
/// intervals between timestamps are tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Basic OHLC sanity check: finite prices, high >= low, high/low bracket
    /// open and close, positive prices.
    pub fn is_sane(&self) -> bool {
        let finite = self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite();
        finite
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Validate an input bar series before any evaluation begins.
///
/// Enforces the series invariant: strictly increasing timestamps (which also
/// rules out duplicates) and sane OHLC on every bar. Failures here are fatal
/// for the whole run, never per-evaluation.
pub fn validate_series(bars: &[Bar]) -> Result<(), CoreError> {
    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_sane() {
            return Err(CoreError::InvalidSeries(format!(
                "insane OHLC at bar {i} ({})",
                bar.timestamp
            )));
        }
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(CoreError::InvalidSeries(format!(
                "timestamps not strictly increasing at bar {i} ({})",
                bar.timestamp
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample_bar(day: u32) -> Bar {
        Bar {
            timestamp: ts(day),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar(2).is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar(2);
        bar.high = 97.0; // below low
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_non_finite() {
        let mut bar = sample_bar(2);
        bar.close = f64::NAN;
        assert!(!bar.is_sane());
    }

    #[test]
    fn series_accepts_sorted_bars() {
        let bars = vec![sample_bar(2), sample_bar(3), sample_bar(4)];
        assert!(validate_series(&bars).is_ok());
    }

    #[test]
    fn series_rejects_duplicate_timestamps() {
        let bars = vec![sample_bar(2), sample_bar(2)];
        assert!(matches!(
            validate_series(&bars),
            Err(CoreError::InvalidSeries(_))
        ));
    }

    #[test]
    fn series_rejects_out_of_order() {
        let bars = vec![sample_bar(3), sample_bar(2)];
        assert!(validate_series(&bars).is_err());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar(2);
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
