//! Wyckoff CLI — download market data and run backtests from the terminal.
//!
//! Commands:
//! - `download` — fetch daily bars from Yahoo Finance and cache as CSV
//! - `run` — run the Wyckoff accumulation backtest for one symbol and print
//!   the metrics table

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use wyckoff_core::backtest::{run_backtest, BacktestParams, BacktestReport, DEFAULT_WINDOW};
use wyckoff_core::data::{
    CircuitBreaker, CsvCache, DataError, FetchProgress, HistoryProvider, StdoutProgress,
    YahooProvider,
};
use wyckoff_core::domain::Bar;

/// Default backtest date range, matching the front end.
const DEFAULT_START: &str = "2020-01-01";
const DEFAULT_END: &str = "2025-06-30";

#[derive(Parser)]
#[command(
    name = "wyckoff",
    about = "Wyckoff CLI — accumulation-pattern backtesting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily bars from Yahoo Finance and cache as CSV.
    Download {
        /// Symbols to download (e.g., GS AAPL NVDA).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD).
        #[arg(long, default_value = DEFAULT_START)]
        start: String,

        /// End date (YYYY-MM-DD).
        #[arg(long, default_value = DEFAULT_END)]
        end: String,

        /// Force re-download even if cached.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Cache directory.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Run the backtest for one symbol and print the metrics table.
    Run {
        /// Symbol to backtest.
        #[arg(long)]
        symbol: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long, default_value = DEFAULT_START)]
        start: String,

        /// End date (YYYY-MM-DD).
        #[arg(long, default_value = DEFAULT_END)]
        end: String,

        /// Rolling-range window in trading days.
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,

        /// Offline mode: cache only, no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Cache directory.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            symbols,
            start,
            end,
            force,
            cache_dir,
        } => run_download(symbols, &start, &end, force, cache_dir),
        Commands::Run {
            symbol,
            start,
            end,
            window,
            offline,
            cache_dir,
        } => run_backtest_cmd(&symbol, &start, &end, window, offline, cache_dir),
    }
}

fn parse_date(s: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid {what} date: {s}"))
}

fn run_download(
    symbols: Vec<String>,
    start: &str,
    end: &str,
    force: bool,
    cache_dir: PathBuf,
) -> Result<()> {
    let start_date = parse_date(start, "start")?;
    let end_date = parse_date(end, "end")?;

    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(circuit_breaker);
    let cache = CsvCache::new(cache_dir);
    let progress = StdoutProgress;

    let total = symbols.len();
    let mut failed = 0usize;

    for (i, symbol) in symbols.iter().enumerate() {
        if !force && cache.contains(symbol) {
            println!("[{}/{}] {symbol} already cached, skipping", i + 1, total);
            continue;
        }

        progress.on_start(symbol, i, total);
        let result = provider
            .fetch(symbol, start_date, end_date)
            .and_then(|fetched| cache.write(symbol, &fetched.bars));
        if result.is_err() {
            failed += 1;
        }
        progress.on_complete(symbol, i, total, &result);
    }

    progress.on_batch_complete(total - failed, failed, total);

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_backtest_cmd(
    symbol: &str,
    start: &str,
    end: &str,
    window: usize,
    offline: bool,
    cache_dir: PathBuf,
) -> Result<()> {
    if window == 0 {
        bail!("--window must be at least 1");
    }

    let start_date = parse_date(start, "start")?;
    let end_date = parse_date(end, "end")?;

    let cache = CsvCache::new(cache_dir);
    let bars = load_bars(symbol, start_date, end_date, offline, &cache)?;

    let params = BacktestParams { window };
    let report = run_backtest(&bars, &params)
        .with_context(|| format!("backtest failed for {symbol}"))?;

    print_summary(symbol, start_date, end_date, bars.len(), &report);
    Ok(())
}

/// Cache first; fall back to the provider unless offline.
fn load_bars(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    offline: bool,
    cache: &CsvCache,
) -> Result<Vec<Bar>> {
    if cache.contains(symbol) {
        return Ok(cache.read_range(symbol, start, end)?);
    }

    if offline {
        return Err(DataError::NoCachedData {
            symbol: symbol.to_string(),
        }
        .into());
    }

    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(circuit_breaker);
    let fetched = provider.fetch(symbol, start, end)?;
    cache.write(symbol, &fetched.bars)?;
    Ok(fetched.bars)
}

fn print_summary(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    bar_count: usize,
    report: &BacktestReport,
) {
    println!();
    println!("=== Wyckoff Backtest ===");
    println!("Symbol:     {symbol}");
    println!("Period:     {start} to {end}");
    println!(
        "Bars:       {bar_count} ({} equity-curve rows)",
        report.equity.len()
    );
    println!(
        "Signals:    {} springs, {} breakouts, {} exits",
        report.spring_count, report.breakout_count, report.exit_count
    );
    println!();
    for (label, value) in report.metrics.rows() {
        println!("{label:<26} {value:>10}");
    }
    println!();
}
