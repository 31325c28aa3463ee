//! In-process store used for dry runs and tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{validate_collection, validate_date_key, TimeSeriesStore};
use crate::error::Result;
use crate::models::RateRecord;

/// Non-persistent [`TimeSeriesStore`] backed by nested `BTreeMap`s.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RefCell<BTreeMap<String, BTreeMap<String, RateRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .borrow()
            .get(collection)
            .map_or(0, |docs| docs.len())
    }
}

impl TimeSeriesStore for MemoryStore {
    fn upsert(&self, collection: &str, date: &str, rates: &BTreeMap<String, Decimal>) -> Result<()> {
        validate_collection(collection)?;
        validate_date_key(date)?;
        self.collections
            .borrow_mut()
            .entry(collection.to_string())
            .or_default()
            .insert(date.to_string(), RateRecord::new(date, rates.clone()));
        Ok(())
    }

    fn get(&self, collection: &str, date: &str) -> Result<Option<RateRecord>> {
        validate_collection(collection)?;
        validate_date_key(date)?;
        Ok(self
            .collections
            .borrow()
            .get(collection)
            .and_then(|docs| docs.get(date))
            .cloned())
    }

    fn range_scan(&self, collection: &str, start: &str, end: &str) -> Result<Vec<RateRecord>> {
        validate_collection(collection)?;
        validate_date_key(start)?;
        validate_date_key(end)?;
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self
            .collections
            .borrow()
            .get(collection)
            .map(|docs| {
                docs.range(start.to_string()..=end.to_string())
                    .map(|(_, record)| record.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}
