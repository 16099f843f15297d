//! On-Balance Volume (OBV).
//!
//! Cumulative and path-dependent: OBV[t] = OBV[t-1] + volume on an up close,
//! - volume on a down close, unchanged on a flat close. Cannot be computed
//! out of order. OBV[0] = 0 by convention.
//! Lookback: 0.

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Obv {
    name: String,
}

impl Obv {
    pub fn new() -> Self {
        Self { name: "obv".into() }
    }
}

impl Default for Obv {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n == 0 {
            return result;
        }

        let mut obv = 0.0;
        result[0] = obv;
        for i in 1..n {
            if bars[i].close > bars[i - 1].close {
                obv += bars[i].volume as f64;
            } else if bars[i].close < bars[i - 1].close {
                obv -= bars[i].volume as f64;
            }
            result[i] = obv;
        }

        result
    }
}
