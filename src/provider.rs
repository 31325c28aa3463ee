//! Spot-rate lookup against freecurrencyapi.com.
//!
//! One blocking call per request, bounded by the client timeout. A response is
//! all-or-nothing: if any requested currency is missing or non-positive the
//! whole quote is rejected.

use std::collections::BTreeMap;
use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::TrackerConfig;
use crate::error::{FxError, Result};
use crate::models::RateQuote;

/// Source of today's spot rates.
pub trait RateProvider: Send {
    /// Rates for each of `targets`, expressed as units of target per one `base`.
    fn latest(&self, base: &str, targets: &[&str]) -> Result<RateQuote>;
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    data: BTreeMap<String, Decimal>,
}

/// Parse a `/latest` response body and check it covers every target.
pub fn parse_latest(body: &str, targets: &[&str]) -> Result<RateQuote> {
    let response: LatestResponse = serde_json::from_str(body)
        .map_err(|e| FxError::RateProvider(format!("malformed response: {}", e)))?;

    let mut quote = RateQuote::new();
    for target in targets {
        let rate = response.data.get(*target).copied().ok_or_else(|| {
            FxError::RateProvider(format!("response is missing a rate for {}", target))
        })?;
        if rate <= Decimal::ZERO {
            return Err(FxError::RateProvider(format!(
                "non-positive rate {} for {}",
                rate, target
            )));
        }
        quote.insert(target.to_string(), rate);
    }
    Ok(quote)
}

// ---------------------------------------------------------------------------
// FreeCurrencyApi
// ---------------------------------------------------------------------------

/// Blocking client for the freecurrencyapi.com `latest` endpoint.
pub struct FreeCurrencyApi {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl FreeCurrencyApi {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn from_config(config: &TrackerConfig, timeout: Duration) -> Result<Self> {
        Self::new(&config.rate_api_url, config.api_key.clone(), timeout)
    }
}

impl RateProvider for FreeCurrencyApi {
    fn latest(&self, base: &str, targets: &[&str]) -> Result<RateQuote> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            FxError::Config(format!(
                "{} is not set; cannot query the rate provider",
                crate::config::API_KEY_VAR
            ))
        })?;
        let currencies = targets.join(",");
        let url = format!("{}/latest", self.base_url);
        info!("Fetching {} -> {} from {}", base, currencies, url);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("apikey", api_key),
                ("base_currency", base),
                ("currencies", currencies.as_str()),
            ])
            .send()
            .map_err(|e| FxError::RateProvider(format!("request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| FxError::RateProvider(format!("failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(FxError::RateProvider(format!("HTTP {}: {}", status, body)));
        }
        debug!("Rate provider returned: {}", body);

        parse_latest(&body, targets)
    }
}
