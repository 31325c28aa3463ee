use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// Today's rates as returned by a rate provider, keyed by currency code.
pub type RateQuote = BTreeMap<String, Decimal>;

// ---------------------------------------------------------------------------
// RateRecord — One persisted day of a currency's time series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// Calendar date key, `YYYY-MM-DD`.
    pub date: String,
    pub rates: BTreeMap<String, Decimal>,
}

impl RateRecord {
    pub fn new(date: impl Into<String>, rates: BTreeMap<String, Decimal>) -> Self {
        Self {
            date: date.into(),
            rates,
        }
    }

    /// Rate stored for `currency` on this date, if the record carries one.
    pub fn rate(&self, currency: &str) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }
}

// ---------------------------------------------------------------------------
// Metric — A derived value that may be undefined
// ---------------------------------------------------------------------------

/// A derived statistic that is either a real value or undefined for lack of history.
///
/// Serializes as a plain decimal; undefined values are written as
/// [`Metric::SENTINEL`] (`-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Value(Decimal),
    Undefined,
}

impl Metric {
    pub const SENTINEL: Decimal = Decimal::NEGATIVE_ONE;

    pub fn value(self) -> Option<Decimal> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Metric::Undefined)
    }

    /// The wire representation: the value, or the sentinel when undefined.
    pub fn raw(self) -> Decimal {
        self.value().unwrap_or(Self::SENTINEL)
    }

    /// Apply `f` to a defined value; undefined stays undefined.
    pub fn map<F>(self, f: F) -> Metric
    where
        F: FnOnce(Decimal) -> Decimal,
    {
        match self {
            Metric::Value(v) => Metric::Value(f(v)),
            Metric::Undefined => Metric::Undefined,
        }
    }
}

impl From<Option<Decimal>> for Metric {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Metric::Undefined, Metric::Value)
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Serialize::serialize(&self.raw(), serializer)
    }
}

// ---------------------------------------------------------------------------
// RateData — Derived statistics for one currency on one day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateData {
    pub base_currency: String,
    pub target_currency: String,
    pub target_symbol: String,
    pub today_rate: Decimal,
    pub change_since_yesterday: Metric,
    pub last_week_avg: Metric,
    /// Reserved; always undefined.
    pub week_over_week_change: Metric,
}
