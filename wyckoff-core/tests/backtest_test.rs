//! End-to-end backtest scenarios.

use chrono::NaiveDate;
use wyckoff_core::backtest::{run_backtest, BacktestError, BacktestParams};
use wyckoff_core::domain::Bar;

fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar {
            symbol: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::days(i as i64),
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
            volume: 1000,
        })
        .collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-10
}

#[test]
fn constant_price_is_flat_curves() {
    // No volatility: zero flags, position flat throughout, both cumulative
    // curves stuck at zero after trimming.
    let bars = bars_from_closes(&vec![100.0; 60]);
    let report = run_backtest(&bars, &BacktestParams::default()).unwrap();

    assert_eq!(report.equity.len(), 20);
    assert!(report.equity.strategy.iter().all(|&v| approx(v, 0.0)));
    assert!(report.equity.buy_hold.iter().all(|&v| approx(v, 0.0)));
    assert_eq!(report.spring_count, 0);
    assert_eq!(report.breakout_count, 0);

    // Total return is cum[last] − 1 on an arithmetic *sum* of returns (an
    // inherited offset convention, not a geometric total return), so a curve
    // flat at zero reports −100%.
    assert_eq!(report.metrics.get("Total Return (Wyckoff)").unwrap(), "-100.00%");
    assert_eq!(report.metrics.get("Total Return (Buy/Hold)").unwrap(), "-100.00%");
}

#[test]
fn spring_entry_goes_long_until_end() {
    // Flat-ish range for the warm-up, a spring at bar 6, then a drift upward.
    // No exit can fire, so the strategy tracks buy-and-hold from the entry bar.
    let mut closes = vec![10.0, 12.0, 11.0, 10.0, 12.0, 11.0, 11.2];
    closes.extend((0..10).map(|i| 11.2 + 0.1 * i as f64));
    let mut bars = bars_from_closes(&closes);
    bars[5].low = 9.0; // pierce support (range low 10)
    bars[5].volume = 5000; // on conviction volume

    let params = BacktestParams { window: 5 };
    let report = run_backtest(&bars, &params).unwrap();
    assert_eq!(report.spring_count, 1);

    // Trimmed curve starts at index 5, the spring bar itself. From the bar
    // after entry onward, per-bar strategy increments equal buy-and-hold
    // increments (position held long, multiplier 1).
    let eq = &report.equity;
    for i in 2..eq.len() {
        let strat_step = eq.strategy[i] - eq.strategy[i - 1];
        let bh_step = eq.buy_hold[i] - eq.buy_hold[i - 1];
        assert!(
            approx(strat_step, bh_step),
            "bar {i}: strategy step {strat_step} != buy-hold step {bh_step}"
        );
    }
}

#[test]
fn flat_strategy_ignores_buy_hold_moves() {
    // Volatile prices but never above resistance or below support on volume:
    // the strategy stays flat while buy-and-hold accumulates.
    let closes: Vec<f64> = (0..60)
        .map(|i| 100.0 + (i as f64 * 1.3).sin() * 5.0)
        .collect();
    let bars = bars_from_closes(&closes);
    let report = run_backtest(&bars, &BacktestParams::default()).unwrap();

    if report.breakout_count == 0 && report.spring_count == 0 {
        assert!(report.equity.strategy.iter().all(|&v| approx(v, 0.0)));
        assert!(report
            .equity
            .buy_hold
            .iter()
            .any(|&v| !approx(v, 0.0)));
    }
}

#[test]
fn buy_hold_curve_is_cumsum_of_pct_change() {
    let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.9).cos() * 10.0).collect();
    let bars = bars_from_closes(&closes);
    let params = BacktestParams { window: 10 };
    let report = run_backtest(&bars, &params).unwrap();

    // Independent oracle: running sum of pct-change, sampled from the
    // trimming start (index = window).
    let mut cum = 0.0;
    let mut expected = Vec::new();
    for i in 1..closes.len() {
        cum += (closes[i] - closes[i - 1]) / closes[i - 1];
        if i >= params.window {
            expected.push(cum);
        }
    }
    assert_eq!(report.equity.buy_hold.len(), expected.len());
    for (got, want) in report.equity.buy_hold.iter().zip(&expected) {
        assert!(approx(*got, *want));
    }
}

#[test]
fn dataset_equal_to_window_fails_insufficient() {
    let bars = bars_from_closes(&vec![100.0; 40]);
    let err = run_backtest(&bars, &BacktestParams::default()).unwrap_err();
    assert!(matches!(err, BacktestError::InsufficientData { .. }));
    assert!(err.to_string().contains("insufficient data"));
}

#[test]
fn single_bar_fails_insufficient() {
    let bars = bars_from_closes(&[100.0]);
    let err = run_backtest(&bars, &BacktestParams { window: 1 }).unwrap_err();
    assert!(matches!(err, BacktestError::InsufficientData { .. }));
}

#[test]
fn void_bar_fails_malformed() {
    let mut bars = bars_from_closes(&vec![100.0; 50]);
    bars[12].high = f64::NAN;
    let err = run_backtest(&bars, &BacktestParams::default()).unwrap_err();
    assert!(matches!(err, BacktestError::MalformedInput { index: 12, .. }));
}

#[test]
fn metrics_formatted_as_percent_two_decimals() {
    let closes: Vec<f64> = (0..50).map(|i| 100.0 * 1.005f64.powi(i)).collect();
    let bars = bars_from_closes(&closes);
    let report = run_backtest(&bars, &BacktestParams::default()).unwrap();

    for (_, value) in report.metrics.rows() {
        assert!(value.ends_with('%'), "missing %: {value}");
        let number = &value[..value.len() - 1];
        let decimals = number.split('.').nth(1).unwrap();
        assert_eq!(decimals.len(), 2, "not two decimals: {value}");
        number.parse::<f64>().unwrap();
    }
}

#[test]
fn report_dates_align_with_input_tail() {
    let bars = bars_from_closes(&(0..45).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
    let report = run_backtest(&bars, &BacktestParams::default()).unwrap();
    assert_eq!(report.equity.len(), 5);
    assert_eq!(report.equity.dates[0], bars[40].date);
    assert_eq!(*report.equity.dates.last().unwrap(), bars[44].date);
}
