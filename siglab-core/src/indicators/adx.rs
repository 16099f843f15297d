//! ADX (Average Directional Index, Wilder).
//!
//! Steps:
//! 1. +DM and -DM from consecutive bars
//! 2. Wilder-smooth +DM, -DM, and TR (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR), -DI symmetric
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * period (period for DI smoothing, then period for ADX).

use crate::domain::Bar;
use crate::indicators::wilder::{true_range, wilder_smooth};
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            name: format!("adx_{period}"),
        }
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        if n < 2 {
            return vec![f64::NAN; n];
        }

        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];

        for i in 1..n {
            let high_diff = bars[i].high - bars[i - 1].high;
            let low_diff = bars[i - 1].low - bars[i].low;

            plus_dm[i] = if high_diff > low_diff && high_diff > 0.0 {
                high_diff
            } else {
                0.0
            };
            minus_dm[i] = if low_diff > high_diff && low_diff > 0.0 {
                low_diff
            } else {
                0.0
            };
        }

        let tr = true_range(bars);
        let smooth_tr = wilder_smooth(&tr, self.period);
        let smooth_plus_dm = wilder_smooth(&plus_dm, self.period);
        let smooth_minus_dm = wilder_smooth(&minus_dm, self.period);

        let mut dx = vec![f64::NAN; n];
        for i in 0..n {
            if smooth_tr[i].is_nan()
                || smooth_plus_dm[i].is_nan()
                || smooth_minus_dm[i].is_nan()
                || smooth_tr[i] == 0.0
            {
                continue;
            }

            let plus_di = 100.0 * smooth_plus_dm[i] / smooth_tr[i];
            let minus_di = 100.0 * smooth_minus_dm[i] / smooth_tr[i];
            let di_sum = plus_di + minus_di;

            dx[i] = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            };
        }

        let mut adx = wilder_smooth(&dx, self.period);
        // The DX seed lands one bar before 2*period; mask it so the warm-up
        // contract (first lookback() values NaN) holds exactly.
        let cut = self.lookback().min(n);
        for v in adx.iter_mut().take(cut) {
            *v = f64::NAN;
        }
        adx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn trending_bars(n: usize) -> Vec<Bar> {
        make_ohlc_bars(
            &(0..n)
                .map(|i| {
                    let base = 100.0 + i as f64 * 2.0;
                    (base, base + 3.0, base - 1.0, base + 2.0)
                })
                .collect::<Vec<_>>(),
        )
    }

    fn choppy_bars(n: usize) -> Vec<Bar> {
        make_ohlc_bars(
            &(0..n)
                .map(|i| {
                    let base = if i % 2 == 0 { 100.0 } else { 101.0 };
                    (base, base + 2.0, base - 2.0, base + if i % 2 == 0 { 1.0 } else { -1.0 })
                })
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn adx_high_in_strong_trend() {
        let bars = trending_bars(40);
        let result = Adx::new(5).compute(&bars);
        let last = result[39];
        assert!(last > 50.0, "strong trend should read high ADX, got {last}");
    }

    #[test]
    fn adx_low_in_chop() {
        let trend = Adx::new(5).compute(&trending_bars(40))[39];
        let chop = Adx::new(5).compute(&choppy_bars(40))[39];
        assert!(chop < trend, "chop ({chop}) should read below trend ({trend})");
    }

    #[test]
    fn adx_bounds() {
        let bars = trending_bars(40);
        let result = Adx::new(5).compute(&bars);
        for &v in result.iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&v), "ADX out of bounds: {v}");
        }
    }

    #[test]
    fn adx_warmup_prefix() {
        let bars = trending_bars(40);
        let adx = Adx::new(5);
        let result = adx.compute(&bars);
        for i in 0..adx.lookback() {
            assert!(result[i].is_nan(), "expected NaN at {i}");
        }
        assert!(!result[adx.lookback()].is_nan());
    }

    #[test]
    fn adx_lookback() {
        assert_eq!(Adx::new(14).lookback(), 28);
    }
}
