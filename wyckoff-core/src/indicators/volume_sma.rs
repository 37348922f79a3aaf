//! Rolling mean of volume.
//!
//! Spring and Breakout both require the bar's volume to exceed this average,
//! the "effort" confirmation in the Wyckoff heuristic.
//! Lookback: period - 1 (first valid value at index period-1).

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct VolumeSma {
    period: usize,
    name: String,
}

impl VolumeSma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume SMA period must be >= 1");
        Self {
            period,
            name: format!("volume_sma_{period}"),
        }
    }
}

impl Indicator for VolumeSma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        // Volume is u64, so no NaN handling is needed; roll a running sum.
        let mut sum: u64 = bars.iter().take(self.period).map(|b| b.volume).sum();
        result[self.period - 1] = sum as f64 / self.period as f64;

        for i in self.period..n {
            sum = sum - bars[i - self.period].volume + bars[i].volume;
            result[i] = sum as f64 / self.period as f64;
        }

        result
    }
}
