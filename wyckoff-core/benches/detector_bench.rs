//! Criterion benchmarks for the detector and the full backtest.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wyckoff_core::backtest::{run_backtest, BacktestParams};
use wyckoff_core::detector;
use wyckoff_core::domain::Bar;

fn synthetic_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + (t * 0.05).sin() * 20.0 + t * 0.01;
            Bar {
                symbol: "BENCH".into(),
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1000 + ((t * 0.3).cos().abs() * 2000.0) as u64,
            }
        })
        .collect()
}

fn bench_detector(c: &mut Criterion) {
    let bars = synthetic_bars(2520); // ~10 years of trading days

    c.bench_function("detect_2520_bars_window_40", |b| {
        b.iter(|| detector::detect(black_box(&bars), black_box(40)))
    });
}

fn bench_backtest(c: &mut Criterion) {
    let bars = synthetic_bars(2520);
    let params = BacktestParams::default();

    c.bench_function("run_backtest_2520_bars", |b| {
        b.iter(|| run_backtest(black_box(&bars), black_box(&params)).unwrap())
    });
}

criterion_group!(benches, bench_detector, bench_backtest);
criterion_main!(benches);
