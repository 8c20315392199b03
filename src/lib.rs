//! Currency converter over the central bank's daily rates.
//!
//! Rates are fetched from the CBR XML feed, appended to a local SQLite store
//! and held in an immutable [`RateSnapshot`] for the session. When the feed is
//! unreachable the last stored snapshot is used instead.

pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod exchange_rate;
pub mod export;
pub mod expression;
pub mod gateway;
pub mod loader;
pub mod prefs;
pub mod store;
pub mod val_curs;

pub use conversion::convert;
pub use error::{ConversionError, ExprError, FeedError, StoreError};
pub use exchange_rate::{RateObservation, RateSnapshot};
pub use expression::evaluate;
pub use gateway::CbrClient;
pub use loader::{LoadedRates, RateSource, load_rates};
pub use store::{HistoryEntry, RateStore};
