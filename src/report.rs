//! Per-currency pipeline outcomes and the run summary.

use std::fmt;

use crate::error::FxError;
use crate::models::{NotificationPayload, RateData};

/// Which side effects a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub notify: bool,
    pub store: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            notify: true,
            store: true,
        }
    }
}

/// Result of one side-effecting step (notify or store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Skipped,
    Failed(String),
}

impl StepStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepStatus::Failed(_))
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Done => write!(f, "done"),
            StepStatus::Skipped => write!(f, "skipped"),
            StepStatus::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Everything one currency's pipeline produced once stats were computed.
#[derive(Debug, Clone)]
pub struct CurrencyOutcome {
    pub currency: String,
    /// Date key the rate belongs to.
    pub date: String,
    pub data: RateData,
    pub payload: NotificationPayload,
    pub notification: StepStatus,
    pub storage: StepStatus,
}

impl CurrencyOutcome {
    /// True when no step failed. Skipped steps count as success.
    pub fn is_success(&self) -> bool {
        !self.notification.is_failed() && !self.storage.is_failed()
    }
}

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

/// Outcome of every currency processed in one run, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub results: Vec<(String, Result<CurrencyOutcome, FxError>)>,
}

impl RunReport {
    pub fn push(&mut self, currency: &str, result: Result<CurrencyOutcome, FxError>) {
        self.results.push((currency.to_string(), result));
    }

    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, Ok(o) if o.is_success()))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit code: 0 when every pipeline succeeded, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.all_succeeded() {
            0
        } else {
            1
        }
    }

    /// Look up the result for a currency.
    pub fn get(&self, currency: &str) -> Option<&Result<CurrencyOutcome, FxError>> {
        self.results
            .iter()
            .find(|(code, _)| code == currency)
            .map(|(_, r)| r)
    }
}
