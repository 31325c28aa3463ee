//! Async wrapper around [`RateTracker`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all tracker operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! HTTP calls and DuckDB reads block.
//!
//! # Example
//!
//! ```no_run
//! use fx_digest::{AsyncRateTracker, RunOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let tracker = AsyncRateTracker::builder().build().await.unwrap();
//!     let report = tracker.run_all(RunOptions::default(), chrono::Utc::now()).await.unwrap();
//!     println!("{} failed", report.failed());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{FxError, Result};
use crate::{RateTracker, RunOptions, RunReport, TrackerConfig};

// ---------------------------------------------------------------------------
// AsyncRateTrackerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncRateTracker`] instance.
#[derive(Default)]
pub struct AsyncRateTrackerBuilder {
    config: Option<TrackerConfig>,
    data_dir: Option<PathBuf>,
    in_memory: bool,
    timeout: Option<Duration>,
}

impl AsyncRateTrackerBuilder {
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom directory for the DuckDB database file.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep the time series in memory.
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the async tracker on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncRateTracker> {
        tokio::task::spawn_blocking(move || {
            let mut builder = RateTracker::builder().in_memory(self.in_memory);
            if let Some(config) = self.config {
                builder = builder.config(config);
            }
            if let Some(dir) = self.data_dir {
                builder = builder.data_dir(dir);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            Ok(AsyncRateTracker::from_tracker(builder.build()?))
        })
        .await
        .map_err(|e| FxError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncRateTracker
// ---------------------------------------------------------------------------

/// Async wrapper around [`RateTracker`].
///
/// The tracker is protected by a [`Mutex`], so concurrent calls are
/// serialized; the store collaborators are not `Sync`.
pub struct AsyncRateTracker {
    inner: Arc<Mutex<RateTracker>>,
}

impl AsyncRateTracker {
    pub fn builder() -> AsyncRateTrackerBuilder {
        AsyncRateTrackerBuilder::default()
    }

    /// Wrap an already-built tracker, e.g. one with custom collaborators.
    pub fn from_tracker(tracker: RateTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Run a sync tracker operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&RateTracker) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let tracker = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = tracker
                .lock()
                .map_err(|_| FxError::InvalidArgument("tracker lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| FxError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Run every configured currency's pipeline.
    pub async fn run_all(&self, options: RunOptions, now: DateTime<Utc>) -> Result<RunReport> {
        self.run(move |t| Ok(t.run_all(&options, &now))).await
    }

    /// Run the pipeline for a single currency.
    pub async fn process(
        &self,
        currency: &str,
        options: RunOptions,
        now: DateTime<Utc>,
    ) -> Result<crate::CurrencyOutcome> {
        let currency = currency.to_string();
        self.run(move |t| t.process(&currency, &options, &now)).await
    }
}
