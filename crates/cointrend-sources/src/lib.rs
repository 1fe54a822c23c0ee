//! Input-side collaborators for cointrend.
//!
//! HTTP collectors fetch each upstream table with a bounded timeout and
//! retry on transient failures; the CSV provider reads and writes those
//! tables in the raw data directory. Every table is obtained independently,
//! so one failing source never blocks the others.

pub mod binance;
pub mod coingecko;
pub mod collect;
pub mod error;
pub mod fear_greed;
pub mod files;
pub mod http;
pub mod news;
pub mod reddit;
pub mod yahoo;

mod retry;

pub use collect::{CollectOutcome, Collector, CollectorSettings};
pub use error::SourceError;
pub use files::{load_raw_inputs, read_table, write_table};
pub use http::{HttpFetcher, HttpSettings};
