//! ESPN golf data ingestion
//!
//! Pulls the current tournament and its field from ESPN's public golf JSON
//! endpoints, normalizes the responses into `PlayerStats` records, and
//! refreshes the pick ledger's stat cache wholesale. The endpoints are
//! undocumented and the selectors brittle; every parse path degrades to
//! "skip the row and log" rather than failing the batch, and a failed
//! refresh leaves the previous cache untouched.

pub mod config;
pub mod fetcher;
pub mod models;
pub mod normalize;
pub mod rankings;

pub use config::FetcherConfig;
pub use fetcher::EspnFetcher;
pub use models::{FetchEvent, Tournament};
