//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDate;

use wyckoff_core::backtest::{BacktestReport, DEFAULT_WINDOW};
use wyckoff_core::data::Watchlist;

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Settings,
    Chart,
    Metrics,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Settings => 0,
            Panel::Chart => 1,
            Panel::Metrics => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Settings),
            1 => Some(Panel::Chart),
            2 => Some(Panel::Metrics),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Settings => "Settings",
            Panel::Chart => "Chart",
            Panel::Metrics => "Metrics",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 4).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 3) % 4).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Which settings field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Ticker,
    Start,
    End,
    Window,
    AddTicker,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            SettingsField::Ticker => SettingsField::Start,
            SettingsField::Start => SettingsField::End,
            SettingsField::End => SettingsField::Window,
            SettingsField::Window => SettingsField::AddTicker,
            SettingsField::AddTicker => SettingsField::Ticker,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SettingsField::Ticker => SettingsField::AddTicker,
            SettingsField::Start => SettingsField::Ticker,
            SettingsField::End => SettingsField::Start,
            SettingsField::Window => SettingsField::End,
            SettingsField::AddTicker => SettingsField::Window,
        }
    }

    /// Fields that capture printable keys for editing.
    pub fn is_text_entry(self) -> bool {
        !matches!(self, SettingsField::Ticker)
    }
}

/// Settings panel state: ticker picker, date range, window.
#[derive(Debug)]
pub struct SettingsState {
    pub watchlist: Watchlist,
    pub selected: usize,
    pub start_input: String,
    pub end_input: String,
    pub window_input: String,
    pub add_ticker_input: String,
    pub focus: SettingsField,
    pub backtest_in_progress: bool,
}

impl SettingsState {
    pub fn new(watchlist: Watchlist) -> Self {
        Self {
            watchlist,
            selected: 0,
            start_input: "2020-01-01".into(),
            end_input: "2025-06-30".into(),
            window_input: DEFAULT_WINDOW.to_string(),
            add_ticker_input: String::new(),
            focus: SettingsField::Ticker,
            backtest_in_progress: false,
        }
    }

    pub fn selected_ticker(&self) -> Option<&str> {
        self.watchlist.tickers.get(self.selected).map(|s| s.as_str())
    }

    /// Parse the inputs into run parameters, with a user-facing error.
    pub fn parse(&self) -> Result<(String, NaiveDate, NaiveDate, usize), String> {
        let symbol = self
            .selected_ticker()
            .ok_or_else(|| "no ticker selected".to_string())?
            .to_string();
        let start = NaiveDate::parse_from_str(&self.start_input, "%Y-%m-%d")
            .map_err(|_| format!("invalid start date: {}", self.start_input))?;
        let end = NaiveDate::parse_from_str(&self.end_input, "%Y-%m-%d")
            .map_err(|_| format!("invalid end date: {}", self.end_input))?;
        if end <= start {
            return Err("end date must be after start date".into());
        }
        let window: usize = self
            .window_input
            .parse()
            .map_err(|_| format!("invalid window: {}", self.window_input))?;
        if window == 0 {
            return Err("window must be at least 1".into());
        }
        Ok((symbol, start, end, window))
    }
}

/// The last completed backtest, for the chart and metrics panels.
#[derive(Debug)]
pub struct ResultState {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub report: Box<BacktestReport>,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub active_panel: Panel,
    pub status_message: Option<(String, StatusLevel)>,
    pub settings: SettingsState,
    pub result: Option<ResultState>,
    pub cache_dir: PathBuf,
    pub watchlist_path: PathBuf,
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        cache_dir: PathBuf,
    ) -> Self {
        let watchlist_path = cache_dir.join("watchlist.toml");
        Self {
            running: true,
            active_panel: Panel::Settings,
            status_message: None,
            settings: SettingsState::new(Watchlist::load_or_default(&watchlist_path)),
            result: None,
            cache_dir,
            watchlist_path,
            worker_tx,
            worker_rx,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    /// Kick off a backtest with the current settings.
    pub fn launch_backtest(&mut self) {
        if self.settings.backtest_in_progress {
            self.set_warning("backtest already running");
            return;
        }
        match self.settings.parse() {
            Ok((symbol, start, end, window)) => {
                self.settings.backtest_in_progress = true;
                self.set_status(format!("Running backtest on {symbol}..."));
                let _ = self.worker_tx.send(WorkerCommand::RunBacktest {
                    symbol,
                    start,
                    end,
                    window,
                    cache_dir: self.cache_dir.clone(),
                });
            }
            Err(e) => self.set_error(e),
        }
    }

    /// Add the typed ticker to the watchlist, select it, and persist the list.
    pub fn add_ticker(&mut self) {
        let ticker = self.settings.add_ticker_input.trim().to_uppercase();
        if ticker.is_empty() {
            self.set_warning("type a ticker symbol first");
            return;
        }
        if self.settings.watchlist.tickers.contains(&ticker) {
            self.set_warning(format!("{ticker} is already on the watchlist"));
            self.settings.add_ticker_input.clear();
            return;
        }

        self.settings.watchlist.add(&ticker);
        self.settings.selected = self.settings.watchlist.len() - 1;
        self.settings.add_ticker_input.clear();

        match self.settings.watchlist.save_to_file(&self.watchlist_path) {
            Ok(()) => self.set_status(format!("{ticker} added to watchlist")),
            Err(e) => self.set_warning(format!("{ticker} added, but saving failed: {e}")),
        }
    }
}
