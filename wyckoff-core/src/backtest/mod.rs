//! Position & return aggregator — stage two of the pipeline.
//!
//! Consumes the detector's per-bar signals, folds them into a long/flat
//! position series, and aggregates per-bar returns into two cumulative
//! equity curves (strategy vs. buy-and-hold) plus summary metrics.
//!
//! Two inherited conventions are preserved deliberately rather than fixed:
//! - The position is applied to the *same* bar's return that its signal
//!   fired on (the signal-to-position transition is instantaneous).
//! - Total return is `cumulative sum of returns − 1`, an offset on an
//!   arithmetic sum, not geometric compounding.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detector::{self, Signal};
use crate::domain::Bar;

/// Default rolling-range window, in trading days.
pub const DEFAULT_WINDOW: usize = 40;

/// Per-bar position state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Flat,
    Long,
}

impl Position {
    /// Fraction of the bar's return captured by the strategy.
    pub fn multiplier(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }
}

/// Explicit configuration for one backtest invocation. No ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestParams {
    /// Rolling-range window length in bars.
    pub window: usize,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

/// Backtest failure modes.
#[derive(Debug, Clone, Error)]
pub enum BacktestError {
    /// A zero window can produce no rolling statistics.
    #[error("invalid window: must be at least 1")]
    InvalidWindow,

    /// A bar has NaN price fields. Required fields are never defaulted.
    #[error("malformed input: bar {index} ({date}) has missing price fields")]
    MalformedInput { index: usize, date: NaiveDate },

    /// The trimmed equity curve has no rows (dataset no longer than the window).
    #[error("insufficient data: {bars} bars with window {window} leave no equity-curve rows")]
    InsufficientData { bars: usize, window: usize },
}

/// Two aligned cumulative-return series, row-indexed by date.
///
/// Trimmed of the leading undefined region: rows start at the first bar
/// where the previous-bar range (and hence any signal) is defined.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquityCurve {
    pub dates: Vec<NaiveDate>,
    pub strategy: Vec<f64>,
    pub buy_hold: Vec<f64>,
}

impl EquityCurve {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Ordered label → formatted-percentage rows, displayable as a two-column table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    rows: Vec<(String, String)>,
}

impl Metrics {
    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// Everything one backtest invocation produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub equity: EquityCurve,
    pub metrics: Metrics,
    pub spring_count: usize,
    pub breakout_count: usize,
    pub exit_count: usize,
}

/// Fold signals into a position series.
///
/// Strictly sequential state machine over {flat, long}: enter latches long,
/// exit latches flat, hold carries the previous state. Initial state is flat.
/// Each step depends on the resolved prior state, so this is an explicit
/// loop — not a scan that could be vectorized.
pub fn position_series(signals: &[Signal]) -> Vec<Position> {
    let mut out = Vec::with_capacity(signals.len());
    let mut position = Position::Flat;
    for &signal in signals {
        match signal {
            Signal::Enter => position = Position::Long,
            Signal::Exit => position = Position::Flat,
            Signal::Hold => {}
        }
        out.push(position);
    }
    out
}

/// Per-bar percent change of close. NaN at index 0.
pub fn buy_hold_returns(bars: &[Bar]) -> Vec<f64> {
    let mut out = vec![f64::NAN; bars.len()];
    for i in 1..bars.len() {
        out[i] = (bars[i].close - bars[i - 1].close) / bars[i - 1].close;
    }
    out
}

/// Running sum that keeps NaN entries NaN but accumulates past them.
fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for &v in values {
        if v.is_nan() {
            out.push(f64::NAN);
        } else {
            sum += v;
            out.push(sum);
        }
    }
    out
}

fn format_pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Run the full backtest: detect patterns, fold positions, aggregate returns.
///
/// Degrades to an all-flat strategy on short-but-nonempty input, but fails
/// with `InvalidWindow` for a zero window, `InsufficientData` when trimming
/// leaves no equity-curve rows, and `MalformedInput` on any bar with NaN
/// price fields.
pub fn run_backtest(bars: &[Bar], params: &BacktestParams) -> Result<BacktestReport, BacktestError> {
    if params.window == 0 {
        return Err(BacktestError::InvalidWindow);
    }

    for (index, bar) in bars.iter().enumerate() {
        if bar.is_void() {
            return Err(BacktestError::MalformedInput {
                index,
                date: bar.date,
            });
        }
    }

    let detection = detector::detect(bars, params.window);
    let positions = position_series(&detection.signals);

    let buy_hold = buy_hold_returns(bars);
    let strategy: Vec<f64> = buy_hold
        .iter()
        .zip(&positions)
        .map(|(&r, p)| r * p.multiplier())
        .collect();

    let cum_strategy = cumulative_sum(&strategy);
    let cum_buy_hold = cumulative_sum(&buy_hold);

    // The curve starts at the first bar whose signal can be defined: the
    // previous-bar range needs `window` bars of history. Everything before
    // that (bar 0 included) is warm-up and dropped from the front.
    let start = params.window.max(1);
    if start >= bars.len() {
        return Err(BacktestError::InsufficientData {
            bars: bars.len(),
            window: params.window,
        });
    }

    let equity = EquityCurve {
        dates: bars[start..].iter().map(|b| b.date).collect(),
        strategy: cum_strategy[start..].to_vec(),
        buy_hold: cum_buy_hold[start..].to_vec(),
    };

    let last = equity.len() - 1;
    let metrics = Metrics {
        rows: vec![
            (
                "Total Return (Wyckoff)".to_string(),
                format_pct(equity.strategy[last] - 1.0),
            ),
            (
                "Total Return (Buy/Hold)".to_string(),
                format_pct(equity.buy_hold[last] - 1.0),
            ),
        ],
    };

    Ok(BacktestReport {
        equity,
        metrics,
        spring_count: detection.spring_count(),
        breakout_count: detection.breakout_count(),
        exit_count: detection.exit_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn fold_latches_long_until_exit() {
        let signals = vec![
            Signal::Hold,
            Signal::Enter,
            Signal::Hold,
            Signal::Hold,
            Signal::Exit,
            Signal::Hold,
        ];
        let positions = position_series(&signals);
        assert_eq!(
            positions,
            vec![
                Position::Flat,
                Position::Long,
                Position::Long,
                Position::Long,
                Position::Flat,
                Position::Flat,
            ]
        );
    }

    #[test]
    fn fold_initial_state_is_flat() {
        let positions = position_series(&[Signal::Hold, Signal::Exit]);
        assert_eq!(positions, vec![Position::Flat, Position::Flat]);
    }

    #[test]
    fn fold_enter_applies_same_bar() {
        // The transition is instantaneous: the entering bar is already long.
        let positions = position_series(&[Signal::Enter]);
        assert_eq!(positions, vec![Position::Long]);
    }

    #[test]
    fn buy_hold_returns_are_pct_change() {
        let bars = make_bars(&[100.0, 110.0, 99.0]);
        let r = buy_hold_returns(&bars);
        assert!(r[0].is_nan());
        assert_approx(r[1], 0.10, DEFAULT_EPSILON);
        assert_approx(r[2], -0.10, DEFAULT_EPSILON);
    }

    #[test]
    fn cumulative_sum_skips_nan_but_keeps_it() {
        let cum = cumulative_sum(&[f64::NAN, 0.1, 0.2, f64::NAN, 0.1]);
        assert!(cum[0].is_nan());
        assert_approx(cum[1], 0.1, DEFAULT_EPSILON);
        assert_approx(cum[2], 0.3, DEFAULT_EPSILON);
        assert!(cum[3].is_nan());
        assert_approx(cum[4], 0.4, DEFAULT_EPSILON);
    }

    #[test]
    fn pct_formatting_two_decimals_with_sign() {
        assert_eq!(format_pct(0.12345), "12.35%");
        assert_eq!(format_pct(-1.0), "-100.00%");
        assert_eq!(format_pct(0.0), "0.00%");
    }

    #[test]
    fn malformed_input_rejected() {
        let mut bars = make_bars(&vec![100.0; 50]);
        bars[7].close = f64::NAN;
        let err = run_backtest(&bars, &BacktestParams { window: 3 }).unwrap_err();
        assert!(matches!(err, BacktestError::MalformedInput { index: 7, .. }));
    }

    #[test]
    fn zero_window_is_an_error_not_a_panic() {
        let bars = make_bars(&vec![100.0; 10]);
        let err = run_backtest(&bars, &BacktestParams { window: 0 }).unwrap_err();
        assert!(matches!(err, BacktestError::InvalidWindow));
    }

    #[test]
    fn dataset_no_longer_than_window_is_insufficient() {
        let bars = make_bars(&vec![100.0; 40]);
        let err = run_backtest(&bars, &BacktestParams::default()).unwrap_err();
        assert!(matches!(
            err,
            BacktestError::InsufficientData {
                bars: 40,
                window: 40
            }
        ));
    }

    #[test]
    fn one_bar_past_window_yields_one_row() {
        let bars = make_bars(&(0..41).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let report = run_backtest(&bars, &BacktestParams::default()).unwrap();
        assert_eq!(report.equity.len(), 1);
        assert_eq!(report.equity.dates[0], bars[40].date);
    }

    #[test]
    fn metrics_are_last_row_minus_one() {
        // The −1 applies to a *sum* of returns, not a compounded product —
        // an inherited offset convention, not a geometric total return.
        let closes: Vec<f64> = (0..45).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let bars = make_bars(&closes);
        let report = run_backtest(&bars, &BacktestParams::default()).unwrap();

        let last = report.equity.len() - 1;
        let expected = format!("{:.2}%", (report.equity.buy_hold[last] - 1.0) * 100.0);
        assert_eq!(
            report.metrics.get("Total Return (Buy/Hold)").unwrap(),
            expected
        );
    }

    #[test]
    fn metrics_rows_are_ordered() {
        let closes: Vec<f64> = (0..45).map(|i| 100.0 + i as f64).collect();
        let report = run_backtest(&make_bars(&closes), &BacktestParams::default()).unwrap();
        let labels: Vec<&str> = report.metrics.rows().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Total Return (Wyckoff)", "Total Return (Buy/Hold)"]
        );
    }
}
