//! Push notifications via ntfy.

use std::time::Duration;

use log::info;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::TrackerConfig;
use crate::error::{FxError, Result};
use crate::format;
use crate::models::NotificationPayload;

/// Transport for a formatted digest.
pub trait Notifier: Send {
    fn send(&self, payload: &NotificationPayload) -> Result<()>;
}

// ---------------------------------------------------------------------------
// ntfy wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct NtfyAction<'a> {
    pub action: &'static str,
    pub label: &'static str,
    pub url: &'a str,
}

/// JSON body accepted by ntfy's publish-as-JSON endpoint.
#[derive(Debug, Serialize)]
pub struct NtfyMessage<'a> {
    pub topic: &'a str,
    pub markdown: bool,
    pub title: &'a str,
    pub tags: &'a [String],
    pub message: String,
    pub actions: Vec<NtfyAction<'a>>,
}

impl<'a> NtfyMessage<'a> {
    pub fn from_payload(payload: &'a NotificationPayload) -> Self {
        Self {
            topic: &payload.channel,
            markdown: true,
            title: &payload.title,
            tags: &payload.tags,
            message: format::message(payload),
            actions: vec![NtfyAction {
                action: "view",
                label: "View current rate",
                url: &payload.action_url,
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// NtfyNotifier
// ---------------------------------------------------------------------------

pub struct NtfyNotifier {
    url: String,
    client: Client,
}

impl NtfyNotifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn from_config(config: &TrackerConfig, timeout: Duration) -> Result<Self> {
        Self::new(&config.ntfy_url, timeout)
    }
}

impl Notifier for NtfyNotifier {
    fn send(&self, payload: &NotificationPayload) -> Result<()> {
        let body = NtfyMessage::from_payload(payload);
        info!("Publishing '{}' to topic {}", payload.title, payload.channel);

        let resp = self
            .client
            .post(&self.url)
            // Keep ntfy from forwarding through Firebase.
            .header("Firebase", "no")
            .json(&body)
            .send()
            .map_err(|e| FxError::Notifier(format!("request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(FxError::Notifier(format!("HTTP {}: {}", status, text)));
        }
        Ok(())
    }
}
