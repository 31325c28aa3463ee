//! Day-over-day change and trailing weekly average for one currency.
//!
//! The engine combines a fresh rate quote with history read from a
//! [`TimeSeriesStore`]. It never writes. All date arithmetic happens on calendar
//! days in the configured reference timezone, so the caller's local timezone
//! cannot move a date boundary.

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use log::{debug, info};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{CurrencyMetadata, TrackerConfig};
use crate::error::{FxError, Result};
use crate::models::{Metric, RateData, RateQuote};
use crate::store::{date_key, TimeSeriesStore};

/// Days covered by the trailing average, counted back from today.
pub const WEEK_WINDOW_DAYS: u64 = 7;

// ---------------------------------------------------------------------------
// StatsEngine
// ---------------------------------------------------------------------------

pub struct StatsEngine<'a> {
    config: &'a TrackerConfig,
    store: &'a dyn TimeSeriesStore,
}

impl<'a> StatsEngine<'a> {
    pub fn new(config: &'a TrackerConfig, store: &'a dyn TimeSeriesStore) -> Self {
        Self { config, store }
    }

    /// Derive [`RateData`] for `currency` from a fresh quote and stored history.
    ///
    /// # Errors
    ///
    /// * `UnknownCurrency` if `currency` is not configured.
    /// * `RateProvider` if `fresh` carries no rate for `currency`.
    /// * `StoreUnavailable` if any history read fails; nothing is recovered locally.
    pub fn compute<Z: TimeZone>(
        &self,
        currency: &str,
        fresh: &RateQuote,
        now: &DateTime<Z>,
    ) -> Result<RateData> {
        let meta = self.config.metadata(currency)?;
        let raw = fresh.get(currency).copied().ok_or_else(|| {
            FxError::RateProvider(format!("quote does not contain a rate for {}", currency))
        })?;
        let today_rate = round_rate(raw, self.config.precision);

        let today = local_date(now, self.config.timezone);
        let yesterday = today - Days::new(1);
        let week_start = today - Days::new(WEEK_WINDOW_DAYS);

        let change_since_yesterday = self.change_since(meta, currency, yesterday, today_rate)?;
        let last_week_avg = self.average(meta, currency, week_start, yesterday)?;

        info!(
            "{}-{} on {}: rate={} change={} avg={}",
            self.config.base_currency,
            currency,
            date_key(today),
            today_rate,
            change_since_yesterday.raw(),
            last_week_avg.raw()
        );

        Ok(RateData {
            base_currency: self.config.base_currency.clone(),
            target_currency: currency.to_string(),
            target_symbol: meta.symbol.clone(),
            today_rate,
            change_since_yesterday,
            last_week_avg,
            week_over_week_change: Metric::Undefined,
        })
    }

    /// `today_rate` minus the rate recorded exactly on `date`.
    ///
    /// Undefined when no record for `date` carries this currency.
    pub fn change_since(
        &self,
        meta: &CurrencyMetadata,
        currency: &str,
        date: NaiveDate,
        today_rate: Decimal,
    ) -> Result<Metric> {
        let key = date_key(date);
        let previous = self
            .store
            .get(&meta.collection, &key)?
            .and_then(|record| record.rate(currency));

        match previous {
            Some(prev) => {
                let prev = round_rate(prev, self.config.precision);
                debug!("{} on {} = {}, today = {}", currency, key, prev, today_rate);
                Ok(Metric::Value(round_rate(today_rate - prev, self.config.precision)))
            }
            None => {
                debug!("No {} record for {}", currency, key);
                Ok(Metric::Undefined)
            }
        }
    }

    /// Mean of the rates recorded in `[start, end]`, both inclusive.
    ///
    /// Days without a record are skipped. Undefined when nothing qualifies.
    pub fn average(
        &self,
        meta: &CurrencyMetadata,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Metric> {
        let (start_key, end_key) = (date_key(start), date_key(end));
        let records = self
            .store
            .range_scan(&meta.collection, &start_key, &end_key)?;
        let rates: Vec<Decimal> = records
            .iter()
            .filter_map(|record| record.rate(currency))
            .collect();

        debug!(
            "Averaging {} over [{}, {}]: {} of {} record(s) usable",
            currency,
            start_key,
            end_key,
            rates.len(),
            records.len()
        );

        Ok(Metric::from(mean(&rates)).map(|avg| round_rate(avg, self.config.precision)))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Round to `precision` fractional digits, ties to even.
pub fn round_rate(value: Decimal, precision: u32) -> Decimal {
    value.round_dp_with_strategy(precision, RoundingStrategy::MidpointNearestEven)
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().copied().sum();
    Some(sum / Decimal::from(values.len()))
}

/// Calendar date of `now` in the reference timezone.
pub fn local_date<Z: TimeZone>(now: &DateTime<Z>, tz: chrono_tz::Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}
