//! Shared test fixtures for the fx-digest integration tests.
//!
//! Provides stub collaborators (rate provider, notifier, failing stores) and
//! helpers for seeding a store with a sparse rate series.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use fx_digest::{
    FxError, MemoryStore, NotificationPayload, Notifier, RateProvider, RateQuote, RateRecord,
    Result, TimeSeriesStore, TrackerConfig,
};
use rust_decimal::Decimal;

pub const INR_COLLECTION: &str = "sgd_inr_exchange_data";
pub const MYR_COLLECTION: &str = "sgd_myr_exchange_data";

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn rates(currency: &str, rate: &str) -> BTreeMap<String, Decimal> {
    BTreeMap::from([(currency.to_string(), dec(rate))])
}

pub fn quote(entries: &[(&str, &str)]) -> RateQuote {
    entries
        .iter()
        .map(|(code, rate)| (code.to_string(), dec(rate)))
        .collect()
}

/// Noon on `date` (`YYYY-MM-DD`) in Singapore time.
pub fn sgt(date: &str) -> DateTime<Tz> {
    sgt_at(date, 12, 0)
}

pub fn sgt_at(date: &str, hour: u32, minute: u32) -> DateTime<Tz> {
    let d = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    chrono_tz::Asia::Singapore
        .from_local_datetime(&d.and_hms_opt(hour, minute, 0).unwrap())
        .unwrap()
}

pub fn config() -> TrackerConfig {
    TrackerConfig::default()
}

/// Write `(date, rate)` pairs for `currency` into `collection`.
pub fn seed(store: &dyn TimeSeriesStore, collection: &str, currency: &str, series: &[(&str, &str)]) {
    for (date, rate) in series {
        store.upsert(collection, date, &rates(currency, rate)).unwrap();
    }
}

// ---------------------------------------------------------------------------
// StubProvider
// ---------------------------------------------------------------------------

/// Returns fixed rates; currencies listed in `failing` produce a provider error.
pub struct StubProvider {
    pub rates: RateQuote,
    pub failing: Vec<String>,
    pub calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl StubProvider {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            rates: quote(entries),
            failing: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_for(mut self, currency: &str) -> Self {
        self.failing.push(currency.to_string());
        self
    }
}

impl RateProvider for StubProvider {
    fn latest(&self, base: &str, targets: &[&str]) -> Result<RateQuote> {
        self.calls.lock().unwrap().push((
            base.to_string(),
            targets.iter().map(|t| t.to_string()).collect(),
        ));
        let mut out = RateQuote::new();
        for target in targets {
            if self.failing.iter().any(|f| f == target) {
                return Err(FxError::RateProvider(format!("upstream down for {}", target)));
            }
            let rate = self.rates.get(*target).copied().ok_or_else(|| {
                FxError::RateProvider(format!("response is missing a rate for {}", target))
            })?;
            out.insert(target.to_string(), rate);
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// Captures every payload; optionally fails every send after recording it.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<NotificationPayload>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<NotificationPayload> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, payload: &NotificationPayload) -> Result<()> {
        self.sent.lock().unwrap().push(payload.clone());
        if self.fail {
            return Err(FxError::Notifier("HTTP 503 Service Unavailable".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Failing stores
// ---------------------------------------------------------------------------

/// Every operation fails as if the backend were unreachable.
pub struct UnavailableStore;

impl TimeSeriesStore for UnavailableStore {
    fn upsert(&self, _: &str, _: &str, _: &BTreeMap<String, Decimal>) -> Result<()> {
        Err(FxError::StoreUnavailable("connection refused".to_string()))
    }

    fn get(&self, _: &str, _: &str) -> Result<Option<RateRecord>> {
        Err(FxError::StoreUnavailable("connection refused".to_string()))
    }

    fn range_scan(&self, _: &str, _: &str, _: &str) -> Result<Vec<RateRecord>> {
        Err(FxError::StoreUnavailable("connection refused".to_string()))
    }
}

/// Reads succeed from an inner [`MemoryStore`]; writes always fail.
#[derive(Default)]
pub struct ReadOnlyStore {
    pub inner: MemoryStore,
}

impl TimeSeriesStore for ReadOnlyStore {
    fn upsert(&self, _: &str, _: &str, _: &BTreeMap<String, Decimal>) -> Result<()> {
        Err(FxError::StoreUnavailable("database is read-only".to_string()))
    }

    fn get(&self, collection: &str, date: &str) -> Result<Option<RateRecord>> {
        self.inner.get(collection, date)
    }

    fn range_scan(&self, collection: &str, start: &str, end: &str) -> Result<Vec<RateRecord>> {
        self.inner.range_scan(collection, start, end)
    }
}
