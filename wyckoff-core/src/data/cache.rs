//! CSV bar cache — one file per symbol plus a small JSON metadata sidecar.
//!
//! Layout: `<dir>/<SYMBOL>.csv` (date,open,high,low,close,volume) and
//! `<dir>/<SYMBOL>.meta.json`. The cache sits above the provider: callers
//! read the cache first and fall back to a provider on a miss.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::provider::DataError;
use crate::domain::Bar;

/// Metadata sidecar for one cached symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub cached_at: NaiveDateTime,
}

/// One row of the on-disk CSV (the symbol lives in the filename).
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Per-symbol cache status, for display.
#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub symbol: String,
    pub cached: bool,
    pub meta: Option<CacheMeta>,
}

/// CSV-on-disk bar cache.
#[derive(Debug, Clone)]
pub struct CsvCache {
    dir: PathBuf,
}

impl CsvCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.meta.json"))
    }

    /// Whether a symbol has cached bars.
    pub fn contains(&self, symbol: &str) -> bool {
        self.csv_path(symbol).is_file()
    }

    /// Write bars for a symbol, replacing any previous cache entry.
    pub fn write(&self, symbol: &str, bars: &[Bar]) -> Result<(), DataError> {
        if bars.is_empty() {
            return Err(DataError::CacheError(format!(
                "refusing to cache empty bar set for {symbol}"
            )));
        }

        fs::create_dir_all(&self.dir)
            .map_err(|e| DataError::CacheError(format!("create cache dir: {e}")))?;

        let mut writer = csv::Writer::from_path(self.csv_path(symbol))
            .map_err(|e| DataError::CacheError(format!("open {symbol}.csv: {e}")))?;
        for bar in bars {
            writer
                .serialize(CsvRow {
                    date: bar.date,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                })
                .map_err(|e| DataError::CacheError(format!("write {symbol}.csv: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| DataError::CacheError(format!("flush {symbol}.csv: {e}")))?;

        let meta = CacheMeta {
            symbol: symbol.to_string(),
            start_date: bars[0].date,
            end_date: bars[bars.len() - 1].date,
            bar_count: bars.len(),
            cached_at: chrono::Local::now().naive_local(),
        };
        let json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("serialize meta: {e}")))?;
        fs::write(self.meta_path(symbol), json)
            .map_err(|e| DataError::CacheError(format!("write meta: {e}")))?;

        Ok(())
    }

    /// Read all cached bars for a symbol.
    pub fn read(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.csv_path(symbol);
        if !path.is_file() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| DataError::CacheError(format!("open {symbol}.csv: {e}")))?;
        let mut bars = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| DataError::CacheError(format!("parse {symbol}.csv: {e}")))?;
            bars.push(Bar {
                symbol: symbol.to_string(),
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }
        Ok(bars)
    }

    /// Read cached bars restricted to a date range (inclusive).
    pub fn read_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let bars = self.read(symbol)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect())
    }

    /// Read the metadata sidecar, if present and parseable.
    pub fn meta(&self, symbol: &str) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path(symbol)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Cache status for a list of symbols.
    pub fn status(&self, symbols: &[&str]) -> Vec<CacheStatus> {
        symbols
            .iter()
            .map(|&symbol| CacheStatus {
                symbol: symbol.to_string(),
                cached: self.contains(symbol),
                meta: self.meta(symbol),
            })
            .collect()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
