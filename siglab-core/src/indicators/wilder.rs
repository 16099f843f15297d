//! True range and Wilder smoothing, plus the ATR indicator built on them.
//!
//! Wilder smoothing is an exponential recurrence with alpha = 1/period,
//! seeded by the mean of the first `period` valid values. Shared by ATR,
//! RSI-style gain/loss averaging, and ADX.

use crate::domain::Bar;
use crate::indicators::Indicator;

/// True Range series.
/// TR[0] = NaN (no previous close to range against).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
///
/// The seed window starts at the first non-NaN value; the seed is the mean of
/// the first `period` values from there.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 {
        return result;
    }

    let start = match values.iter().position(|v| !v.is_nan()) {
        Some(s) => s,
        None => return result,
    };
    if n - start < period {
        return result;
    }

    let seed: f64 = values[start..start + period].iter().sum::<f64>() / period as f64;
    let seed_index = start + period - 1;
    result[seed_index] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in (seed_index + 1)..n {
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

/// Average True Range: Wilder-smoothed true range.
/// Lookback: period (TR itself consumes one bar).
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        wilder_smooth(&true_range(bars), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert!(tr[0].is_nan());
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Gap up: prev close 100, current bar 110-115-108
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_smooth_known_values() {
        let values = [f64::NAN, 8.0, 9.0, 6.0, 6.0];
        let result = wilder_smooth(&values, 3);
        assert!(result[2].is_nan());
        // Seed at index 3: mean(8, 9, 6) = 23/3
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        // Next: (1/3)*6 + (2/3)*(23/3) = 64/9
        assert_approx(result[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ]);
        let result = Atr::new(3).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[2].is_nan());
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_lookback() {
        assert_eq!(Atr::new(14).lookback(), 14);
    }
}
