//! Rolling indicators feeding the pattern detector.
//!
//! Indicators are pure functions: bar history in, numeric series out.
//! Each output is the same length as the input, left-padded with `f64::NAN`
//! for the first `lookback()` positions (trailing, right-aligned windows —
//! the value at bar t never depends on bar t+1 or later).

pub mod range_extreme;
pub mod volume_sma;

pub use range_extreme::{RangeBand, RangeExtreme};
pub use volume_sma::VolumeSma;

use crate::domain::Bar;

/// Trait for rolling indicators.
///
/// Returns a `Vec<f64>` of the same length as `bars`, with the first
/// `lookback()` values set to `f64::NAN` (warm-up).
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "range_high_40").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
