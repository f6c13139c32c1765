//! Pick ledger for the PGA fantasy tracker
//!
//! Owns the single SQLite file behind the tracker: the append-only picks
//! ledger, the derived locked-player set, and the time-stamped stat cache.
//! A pick insert and its lock-set entry commit in one transaction, so the
//! two can never drift apart; availability checks read only the lock set.

pub mod error;
pub mod store;
pub mod types;

pub use error::{LedgerError, Result};
pub use store::PickLedger;
pub use types::{CachedStats, NewPick, PickRecord, SeasonSummary};
