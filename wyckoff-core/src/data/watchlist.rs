//! Watchlist — the selectable ticker list behind the front-end dropdown.
//!
//! Stored as a TOML file; falls back to a small built-in default list.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered list of selectable tickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watchlist {
    pub tickers: Vec<String>,
}

impl Watchlist {
    /// Load a watchlist from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read watchlist file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a watchlist from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse watchlist TOML: {e}"))
    }

    /// Serialize the watchlist to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize watchlist: {e}"))
    }

    /// Write the watchlist to a TOML file, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("create watchlist dir: {e}"))?;
        }
        std::fs::write(path, self.to_toml()?)
            .map_err(|e| format!("write watchlist file: {e}"))
    }

    /// Load from a TOML file, falling back to the built-in list when the
    /// file is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        Self::from_file(path).unwrap_or_else(|_| Self::default_list())
    }

    /// Built-in default list.
    pub fn default_list() -> Self {
        Self {
            tickers: ["GS", "AAPL", "GOOGL", "AMZN", "NVDA"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Add a ticker if not already present (uppercased).
    pub fn add(&mut self, ticker: &str) {
        let ticker = ticker.trim().to_uppercase();
        if !ticker.is_empty() && !self.tickers.contains(&ticker) {
            self.tickers.push(ticker);
        }
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::default_list()
    }
}
