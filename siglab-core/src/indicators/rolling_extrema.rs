//! Rolling highest-high and lowest-low.
//!
//! Maintained with a monotonic deque: each bar index is pushed and popped at
//! most once, so the whole series is computed in a single O(n) sweep.
//! Lookback: period - 1.

use std::collections::VecDeque;

use crate::domain::Bar;
use crate::indicators::Indicator;

/// Rolling maximum of `high` over the trailing window (inclusive of the
/// current bar).
#[derive(Debug, Clone)]
pub struct RollingHigh {
    period: usize,
    name: String,
}

/// Rolling minimum of `low` over the trailing window.
#[derive(Debug, Clone)]
pub struct RollingLow {
    period: usize,
    name: String,
}

impl RollingHigh {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "rolling window must be >= 1");
        Self {
            period,
            name: format!("hh_{period}"),
        }
    }
}

impl RollingLow {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "rolling window must be >= 1");
        Self {
            period,
            name: format!("ll_{period}"),
        }
    }
}

/// Monotonic-deque rolling extremum over `values`.
/// `better(a, b)` returns true when `a` should displace `b` from the deque
/// (e.g. `>=` for a rolling max).
pub(crate) fn rolling_extremum(
    values: &[f64],
    period: usize,
    better: impl Fn(f64, f64) -> bool,
) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    let mut deque: VecDeque<usize> = VecDeque::new();

    for i in 0..n {
        while let Some(&back) = deque.back() {
            if better(values[i], values[back]) {
                deque.pop_back();
            } else {
                break;
            }
        }
        deque.push_back(i);

        // Drop indices that left the window
        while let Some(&front) = deque.front() {
            if front + period <= i {
                deque.pop_front();
            } else {
                break;
            }
        }

        if i + 1 >= period {
            result[i] = values[*deque.front().expect("deque never empty here")];
        }
    }

    result
}

impl Indicator for RollingHigh {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        rolling_extremum(&highs, self.period, |a, b| a >= b)
    }
}

impl Indicator for RollingLow {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        rolling_extremum(&lows, self.period, |a, b| a <= b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn rolling_high_window_3() {
        // make_bars highs: max(open, close) + 1.0
        let bars = make_bars(&[10.0, 12.0, 11.0, 9.0, 13.0]);
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let result = RollingHigh::new(3).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        for i in 2..5 {
            let expected = highs[i - 2..=i].iter().cloned().fold(f64::MIN, f64::max);
            assert_approx(result[i], expected, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn rolling_low_window_3() {
        let bars = make_bars(&[10.0, 12.0, 11.0, 9.0, 13.0]);
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let result = RollingLow::new(3).compute(&bars);

        assert!(result[1].is_nan());
        for i in 2..5 {
            let expected = lows[i - 2..=i].iter().cloned().fold(f64::MAX, f64::min);
            assert_approx(result[i], expected, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn window_1_is_identity() {
        let bars = make_bars(&[10.0, 12.0, 11.0]);
        let result = RollingHigh::new(1).compute(&bars);
        for (i, bar) in bars.iter().enumerate() {
            assert_approx(result[i], bar.high, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn matches_naive_scan() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + ((i * 7) % 13) as f64).collect();
        let bars = make_bars(&closes);
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let result = RollingHigh::new(10).compute(&bars);
        for i in 9..60 {
            let naive = highs[i - 9..=i].iter().cloned().fold(f64::MIN, f64::max);
            assert_approx(result[i], naive, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn lookbacks() {
        assert_eq!(RollingHigh::new(20).lookback(), 19);
        assert_eq!(RollingLow::new(1).lookback(), 0);
    }
}
