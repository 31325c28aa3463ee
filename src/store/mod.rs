//! Date-keyed time-series storage for daily rates.
//!
//! Each tracked currency owns one collection. Documents are keyed by a
//! `YYYY-MM-DD` date string in the reference timezone, so lexicographic key
//! order is chronological order. A missing document is a normal outcome
//! (`Ok(None)` / empty scan); only backend failures are errors.

pub mod duckdb_store;
pub mod memory;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{FxError, Result};
use crate::models::RateRecord;

pub use self::duckdb_store::DuckDbStore;
pub use self::memory::MemoryStore;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Storage contract the stats engine and orchestrator depend on.
pub trait TimeSeriesStore: Send {
    /// Write the rates for `(collection, date)`, replacing any existing record.
    fn upsert(&self, collection: &str, date: &str, rates: &BTreeMap<String, Decimal>) -> Result<()>;

    /// Point lookup of a single day.
    fn get(&self, collection: &str, date: &str) -> Result<Option<RateRecord>>;

    /// All records with `start <= date <= end`, ascending by date.
    fn range_scan(&self, collection: &str, start: &str, end: &str) -> Result<Vec<RateRecord>>;
}

/// Format a calendar date as a store key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Reject anything that is not a canonical `YYYY-MM-DD` key.
///
/// Non-canonical forms such as `2024-6-1` would break key ordering.
pub fn validate_date_key(date: &str) -> Result<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(date, DATE_KEY_FORMAT)
        .map_err(|_| FxError::InvalidArgument(format!("invalid date key '{}'", date)))?;
    if date_key(parsed) != date {
        return Err(FxError::InvalidArgument(format!(
            "date key '{}' is not in YYYY-MM-DD form",
            date
        )));
    }
    Ok(parsed)
}

fn validate_collection(collection: &str) -> Result<()> {
    if collection.trim().is_empty() {
        return Err(FxError::InvalidArgument("collection name is empty".to_string()));
    }
    Ok(())
}
