//! Background worker thread — data fetch and backtest run off the render thread.
//!
//! Communication with the TUI main thread is via `mpsc` channels. One command
//! in flight at a time; the render loop keeps drawing while the worker blocks
//! on the network or the engine.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::NaiveDate;

use wyckoff_core::backtest::{run_backtest, BacktestParams, BacktestReport};
use wyckoff_core::data::{CircuitBreaker, CsvCache, HistoryProvider, YahooProvider};
use wyckoff_core::domain::Bar;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    RunBacktest {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
        window: usize,
        cache_dir: PathBuf,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    /// Progress note while fetching/computing.
    Status(String),
    BacktestDone {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
        report: Box<BacktestReport>,
    },
    BacktestFailed {
        symbol: String,
        error: String,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("wyckoff-worker".into())
        .spawn(move || worker_loop(rx, tx))
        .expect("failed to spawn worker thread")
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::RunBacktest {
                symbol,
                start,
                end,
                window,
                cache_dir,
            }) => handle_backtest(&symbol, start, end, window, &cache_dir, &tx),
        }
    }
}

fn handle_backtest(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    window: usize,
    cache_dir: &Path,
    tx: &Sender<WorkerResponse>,
) {
    let cache = CsvCache::new(cache_dir);

    let bars = match load_bars(symbol, start, end, &cache, tx) {
        Ok(bars) => bars,
        Err(error) => {
            let _ = tx.send(WorkerResponse::BacktestFailed {
                symbol: symbol.to_string(),
                error,
            });
            return;
        }
    };

    let params = BacktestParams { window };
    match run_backtest(&bars, &params) {
        Ok(report) => {
            let _ = tx.send(WorkerResponse::BacktestDone {
                symbol: symbol.to_string(),
                start,
                end,
                report: Box::new(report),
            });
        }
        Err(e) => {
            let _ = tx.send(WorkerResponse::BacktestFailed {
                symbol: symbol.to_string(),
                error: e.to_string(),
            });
        }
    }
}

/// Cache first, provider fallback; caches what it fetches.
fn load_bars(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    cache: &CsvCache,
    tx: &Sender<WorkerResponse>,
) -> Result<Vec<Bar>, String> {
    if cache.contains(symbol) {
        let _ = tx.send(WorkerResponse::Status(format!("Loading {symbol} from cache...")));
        return cache
            .read_range(symbol, start, end)
            .map_err(|e| e.to_string());
    }

    let _ = tx.send(WorkerResponse::Status(format!("Fetching {symbol}...")));
    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(circuit_breaker);
    let fetched = provider
        .fetch(symbol, start, end)
        .map_err(|e| e.to_string())?;
    if let Err(e) = cache.write(symbol, &fetched.bars) {
        let _ = tx.send(WorkerResponse::Status(format!("cache write failed: {e}")));
    }
    Ok(fetched.bars)
}
