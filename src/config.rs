//! Tracker configuration: base currency, reference timezone, currency table and endpoints.
//!
//! A [`TrackerConfig`] is built once at start-up and passed by reference into the
//! stats engine and the orchestrator. Nothing in this crate reads configuration
//! from globals after that point.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FxError, Result};

pub const BASE_CURRENCY: &str = "SGD";
pub const REFERENCE_TIMEZONE: Tz = chrono_tz::Asia::Singapore;
pub const DECIMAL_PRECISION: u32 = 3;
pub const RATE_API_BASE: &str = "https://api.freecurrencyapi.com/v1";
pub const NTFY_URL: &str = "https://ntfy.sh/";

pub const API_KEY_VAR: &str = "FREE_CURRENCY_API_KEY";
pub const BASE_CURRENCY_VAR: &str = "FX_DIGEST_BASE_CURRENCY";
pub const TIMEZONE_VAR: &str = "FX_DIGEST_TIMEZONE";
pub const NTFY_URL_VAR: &str = "FX_DIGEST_NTFY_URL";
pub const RATE_API_URL_VAR: &str = "FX_DIGEST_RATE_API_URL";

// ---------------------------------------------------------------------------
// CurrencyMetadata
// ---------------------------------------------------------------------------

/// Static description of one tracked target currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyMetadata {
    pub name: String,
    /// Display symbol, e.g. `₹` or `RM`.
    pub symbol: String,
    /// Plain ASCII symbol for places that can't render the display symbol.
    pub char_symbol: String,
    /// Notification tag.
    pub tag: String,
    /// Page opened by the notification's "view" action.
    pub reference_url: String,
    /// Store collection holding this currency's time series.
    pub collection: String,
    /// ntfy topic the digest is published to.
    pub notification_topic: String,
}

pub fn default_currencies() -> BTreeMap<String, CurrencyMetadata> {
    BTreeMap::from([
        (
            "INR".to_string(),
            CurrencyMetadata {
                name: "Indian Rupee".to_string(),
                symbol: "₹".to_string(),
                char_symbol: "INR".to_string(),
                tag: "india".to_string(),
                reference_url: "https://wise.com/gb/currency-converter/sgd-to-inr-rate".to_string(),
                collection: "sgd_inr_exchange_data".to_string(),
                notification_topic: "dbarr_inr_updates".to_string(),
            },
        ),
        (
            "MYR".to_string(),
            CurrencyMetadata {
                name: "Malaysian Ringgit".to_string(),
                symbol: "RM".to_string(),
                char_symbol: "RM".to_string(),
                tag: "malaysia".to_string(),
                reference_url: "https://wise.com/gb/currency-converter/sgd-to-myr-rate".to_string(),
                collection: "sgd_myr_exchange_data".to_string(),
                notification_topic: "dbarr_myr_updates".to_string(),
            },
        ),
    ])
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("fx-digest")
    } else {
        PathBuf::from(".fx-digest")
    }
}

/// Default location of the DuckDB time-series database.
pub fn default_db_path() -> PathBuf {
    default_data_dir().join("rates.duckdb")
}

// ---------------------------------------------------------------------------
// TrackerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub base_currency: String,
    /// Timezone that defines calendar-day boundaries for date keys.
    pub timezone: Tz,
    /// Fractional digits kept on every stored and derived rate.
    pub precision: u32,
    pub currencies: BTreeMap<String, CurrencyMetadata>,
    pub rate_api_url: String,
    pub ntfy_url: String,
    pub api_key: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_currency: BASE_CURRENCY.to_string(),
            timezone: REFERENCE_TIMEZONE,
            precision: DECIMAL_PRECISION,
            currencies: default_currencies(),
            rate_api_url: RATE_API_BASE.to_string(),
            ntfy_url: NTFY_URL.to_string(),
            api_key: None,
        }
    }
}

impl TrackerConfig {
    /// Build a config from the process environment on top of the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.api_key = get(API_KEY_VAR);
        if let Some(base) = get(BASE_CURRENCY_VAR) {
            config.base_currency = base.to_uppercase();
        }
        if let Some(tz) = get(TIMEZONE_VAR) {
            config.timezone = tz
                .parse::<Tz>()
                .map_err(|e| FxError::Config(format!("invalid timezone '{}': {}", tz, e)))?;
        }
        if let Some(url) = get(NTFY_URL_VAR) {
            config.ntfy_url = url;
        }
        if let Some(url) = get(RATE_API_URL_VAR) {
            config.rate_api_url = url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }

    /// Replace the currency table with one read from a JSON file.
    ///
    /// The file is an object keyed by currency code; codes are upper-cased.
    pub fn with_currency_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let table: BTreeMap<String, CurrencyMetadata> = serde_json::from_str(&contents)?;
        if table.is_empty() {
            return Err(FxError::Config(format!(
                "currency file {} defines no currencies",
                path.as_ref().display()
            )));
        }
        self.currencies = table
            .into_iter()
            .map(|(code, meta)| (code.to_uppercase(), meta))
            .collect();
        Ok(self)
    }

    /// Look up a currency's metadata, failing with `UnknownCurrency`.
    pub fn metadata(&self, code: &str) -> Result<&CurrencyMetadata> {
        self.currencies
            .get(code)
            .ok_or_else(|| FxError::UnknownCurrency(code.to_string()))
    }

    /// Configured currency codes in sorted order.
    pub fn currency_codes(&self) -> Vec<String> {
        self.currencies.keys().cloned().collect()
    }
}
