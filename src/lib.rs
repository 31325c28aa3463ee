//! Daily exchange-rate digest.
//!
//! Fetches today's rate for a fixed base currency against each configured
//! target currency, derives the day-over-day change and trailing weekly
//! average from a DuckDB time series, publishes a push notification and
//! records the day's rate.
//!
//! # Quick start
//!
//! ```no_run
//! use fx_digest::{RateTracker, RunOptions, TrackerConfig};
//!
//! let config = TrackerConfig::from_env().unwrap();
//! let tracker = RateTracker::builder().config(config).build().unwrap();
//!
//! let report = tracker.run_all(&RunOptions::default(), &chrono::Utc::now());
//! std::process::exit(report.exit_code());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod notifier;
pub mod provider;
pub mod report;
pub mod sql_builder;
pub mod stats;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncRateTracker;
pub use config::{CurrencyMetadata, TrackerConfig};
pub use error::{FxError, Result};
pub use models::{ChangeIndicator, Metric, NotificationPayload, RateData, RateQuote, RateRecord};
pub use notifier::{Notifier, NtfyNotifier};
pub use provider::{FreeCurrencyApi, RateProvider};
pub use report::{CurrencyOutcome, RunOptions, RunReport, StepStatus};
pub use sql_builder::SqlBuilder;
pub use stats::StatsEngine;
pub use store::{DuckDbStore, MemoryStore, TimeSeriesStore};

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone};
use log::{error, info, warn};

// ---------------------------------------------------------------------------
// RateTrackerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`RateTracker`].
///
/// Any collaborator that is not supplied explicitly is built from the
/// config: a file-backed [`DuckDbStore`], a [`FreeCurrencyApi`] provider and
/// an [`NtfyNotifier`].
pub struct RateTrackerBuilder {
    config: Option<TrackerConfig>,
    data_dir: Option<PathBuf>,
    in_memory: bool,
    timeout: Duration,
    store: Option<Box<dyn TimeSeriesStore>>,
    provider: Option<Box<dyn RateProvider>>,
    notifier: Option<Box<dyn Notifier>>,
}

impl Default for RateTrackerBuilder {
    fn default() -> Self {
        Self {
            config: None,
            data_dir: None,
            in_memory: false,
            timeout: Duration::from_secs(30),
            store: None,
            provider: None,
            notifier: None,
        }
    }
}

impl RateTrackerBuilder {
    /// Use this configuration instead of [`TrackerConfig::default()`].
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Directory holding the DuckDB database file.
    ///
    /// If not set, the platform data directory is used
    /// (e.g. `~/.local/share/fx-digest` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep the time series in an in-memory DuckDB database. Defaults to `false`.
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Deadline applied to every HTTP call. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store<S: TimeSeriesStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn provider<P: RateProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn notifier<N: Notifier + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Build the tracker, opening the store and HTTP clients as needed.
    pub fn build(self) -> Result<RateTracker> {
        let config = self.config.unwrap_or_default();

        let store: Box<dyn TimeSeriesStore> = match self.store {
            Some(store) => store,
            None if self.in_memory => Box::new(DuckDbStore::open_in_memory()?),
            None => {
                let dir = self.data_dir.unwrap_or_else(config::default_data_dir);
                Box::new(DuckDbStore::open(dir.join("rates.duckdb"))?)
            }
        };
        let provider: Box<dyn RateProvider> = match self.provider {
            Some(provider) => provider,
            None => Box::new(FreeCurrencyApi::from_config(&config, self.timeout)?),
        };
        let notifier: Box<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Box::new(NtfyNotifier::from_config(&config, self.timeout)?),
        };

        Ok(RateTracker {
            config,
            store,
            provider,
            notifier,
        })
    }
}

// ---------------------------------------------------------------------------
// RateTracker
// ---------------------------------------------------------------------------

/// Runs fetch -> compute -> (notify, store) for each configured currency.
///
/// Each currency's pipeline is isolated: a failure in one never stops the
/// others, and a notification failure never blocks the store write.
pub struct RateTracker {
    config: TrackerConfig,
    store: Box<dyn TimeSeriesStore>,
    provider: Box<dyn RateProvider>,
    notifier: Box<dyn Notifier>,
}

impl RateTracker {
    pub fn builder() -> RateTrackerBuilder {
        RateTrackerBuilder::default()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn TimeSeriesStore {
        &*self.store
    }

    /// Stats engine bound to this tracker's config and store.
    pub fn stats(&self) -> StatsEngine<'_> {
        StatsEngine::new(&self.config, &*self.store)
    }

    /// Fetch today's quote for one configured currency.
    pub fn fetch(&self, currency: &str) -> Result<RateQuote> {
        self.config.metadata(currency)?;
        self.provider.latest(&self.config.base_currency, &[currency])
    }

    /// Run the full pipeline for one currency.
    ///
    /// Fetch and compute failures abort and are returned. Notify and store
    /// failures are logged and recorded in the outcome instead.
    pub fn process<Z: TimeZone>(
        &self,
        currency: &str,
        options: &RunOptions,
        now: &DateTime<Z>,
    ) -> Result<CurrencyOutcome> {
        let meta = self.config.metadata(currency)?;
        let quote = self.fetch(currency)?;
        let data = self.stats().compute(currency, &quote, now)?;
        let payload = format::build_payload(&data, meta);
        let date = store::date_key(stats::local_date(now, self.config.timezone));

        let notification = if options.notify {
            match self.notifier.send(&payload) {
                Ok(()) => StepStatus::Done,
                Err(e) => {
                    warn!("Notification for {} failed: {}", currency, e);
                    StepStatus::Failed(e.to_string())
                }
            }
        } else {
            StepStatus::Skipped
        };

        let storage = if options.store {
            let rates = BTreeMap::from([(currency.to_string(), data.today_rate)]);
            match self.store.upsert(&meta.collection, &date, &rates) {
                Ok(()) => {
                    info!("Stored {} = {} in {}/{}", currency, data.today_rate, meta.collection, date);
                    StepStatus::Done
                }
                Err(e) => {
                    error!("Writing {} to {}/{} failed: {}", currency, meta.collection, date, e);
                    StepStatus::Failed(e.to_string())
                }
            }
        } else {
            StepStatus::Skipped
        };

        Ok(CurrencyOutcome {
            currency: currency.to_string(),
            date,
            data,
            payload,
            notification,
            storage,
        })
    }

    /// Run the pipeline for every configured currency.
    pub fn run_all<Z: TimeZone>(&self, options: &RunOptions, now: &DateTime<Z>) -> RunReport {
        let currencies = self.config.currency_codes();
        self.run_currencies(&currencies, options, now)
    }

    /// Run the pipeline for the given currencies, in order.
    pub fn run_currencies<Z: TimeZone>(
        &self,
        currencies: &[String],
        options: &RunOptions,
        now: &DateTime<Z>,
    ) -> RunReport {
        let mut report = RunReport::default();
        for currency in currencies {
            let result = self.process(currency, options, now);
            match &result {
                Ok(outcome) => info!(
                    "{}: notification {}, storage {}",
                    currency, outcome.notification, outcome.storage
                ),
                Err(e) => error!("{}: pipeline aborted: {}", currency, e),
            }
            report.push(currency, result);
        }
        info!(
            "Run finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }

    /// Stored history for a currency, optionally bounded on either side.
    pub fn history(
        &self,
        currency: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<RateRecord>> {
        let meta = self.config.metadata(currency)?;
        let start = from.map(store::date_key).unwrap_or_else(|| "0001-01-01".to_string());
        let end = to.map(store::date_key).unwrap_or_else(|| "9999-12-31".to_string());
        self.store.range_scan(&meta.collection, &start, &end)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for RateTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RateTracker(base={}, currencies=[{}], timezone={})",
            self.config.base_currency,
            self.config.currency_codes().join(", "),
            self.config.timezone
        )
    }
}
