//! Rolling close-price range — highest / lowest close over a trailing window.
//!
//! This is the accumulation range the Wyckoff heuristic trades around:
//! - High: max(close[t-period+1..=t]) — resistance
//! - Low:  min(close[t-period+1..=t]) — support
//!
//! Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::Indicator;

/// Which edge of the range to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBand {
    High,
    Low,
}

#[derive(Debug, Clone)]
pub struct RangeExtreme {
    period: usize,
    band: RangeBand,
    name: String,
}

impl RangeExtreme {
    pub fn high(period: usize) -> Self {
        assert!(period >= 1, "range period must be >= 1");
        Self {
            period,
            band: RangeBand::High,
            name: format!("range_high_{period}"),
        }
    }

    pub fn low(period: usize) -> Self {
        assert!(period >= 1, "range period must be >= 1");
        Self {
            period,
            band: RangeBand::Low,
            name: format!("range_low_{period}"),
        }
    }
}

impl Indicator for RangeExtreme {
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

        for i in (self.period - 1)..n {
            let start = i + 1 - self.period;
            let window = &bars[start..=i];

            let mut extreme = match self.band {
                RangeBand::High => f64::NEG_INFINITY,
                RangeBand::Low => f64::INFINITY,
            };
            let mut has_nan = false;
            for bar in window {
                if bar.close.is_nan() {
                    has_nan = true;
                    break;
                }
                match self.band {
                    RangeBand::High => {
                        if bar.close > extreme {
                            extreme = bar.close;
                        }
                    }
                    RangeBand::Low => {
                        if bar.close < extreme {
                            extreme = bar.close;
                        }
                    }
                }
            }
            result[i] = if has_nan { f64::NAN } else { extreme };
        }

        result
    }
}
