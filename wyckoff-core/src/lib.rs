//! Wyckoff Core — pattern detector, backtest engine, and market-data layer.
//!
//! The heart of the crate is a two-stage pipeline over a daily OHLCV series:
//! - `detector` — rolling 40-day close range and volume average, Spring /
//!   Breakout / Weakness pattern flags, per-bar enter/exit/hold signals
//! - `backtest` — sequential position fold, per-bar strategy and
//!   buy-and-hold returns, cumulative equity curves, summary metrics
//!
//! The `data` module holds the collaborators around the engine: a Yahoo
//! Finance provider, a CSV bar cache, and the selectable ticker watchlist.
//! The engine itself never fetches — callers materialize bars first.

pub mod backtest;
pub mod data;
pub mod detector;
pub mod domain;
pub mod indicators;

pub use backtest::{run_backtest, BacktestError, BacktestParams, BacktestReport};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types crossing the TUI worker channel are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<detector::Signal>();
        require_sync::<detector::Signal>();
        require_send::<backtest::EquityCurve>();
        require_sync::<backtest::EquityCurve>();
        require_send::<backtest::Metrics>();
        require_sync::<backtest::Metrics>();
        require_send::<backtest::BacktestReport>();
        require_sync::<backtest::BacktestReport>();
        require_send::<backtest::BacktestError>();
        require_sync::<backtest::BacktestError>();
        require_send::<data::provider::DataError>();
        require_sync::<data::provider::DataError>();
        require_send::<data::watchlist::Watchlist>();
        require_sync::<data::watchlist::Watchlist>();
    }
}
