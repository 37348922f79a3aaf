//! Market-data collaborators: provider, cache, watchlist.
//!
//! The engine never fetches; these modules materialize bars for it.

pub mod cache;
pub mod circuit_breaker;
pub mod provider;
pub mod watchlist;
pub mod yahoo;

pub use cache::CsvCache;
pub use circuit_breaker::CircuitBreaker;
pub use provider::{DataError, FetchProgress, FetchResult, HistoryProvider, StdoutProgress};
pub use watchlist::Watchlist;
pub use yahoo::YahooProvider;
