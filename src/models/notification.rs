use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rate::Metric;

// ---------------------------------------------------------------------------
// ChangeIndicator — Direction of the day-over-day move
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeIndicator {
    Up,
    Flat,
    Down,
    /// No rate was recorded yesterday.
    Unknown,
}

impl ChangeIndicator {
    /// Classify a day-over-day change. The undefined case is checked before the sign.
    pub fn from_change(change: Metric) -> Self {
        match change.value() {
            None => ChangeIndicator::Unknown,
            Some(v) if v > Decimal::ZERO => ChangeIndicator::Up,
            Some(v) if v.is_zero() => ChangeIndicator::Flat,
            Some(_) => ChangeIndicator::Down,
        }
    }

    /// Marker prefixed to the change in the notification body.
    pub fn marker(self) -> &'static str {
        match self {
            ChangeIndicator::Up => "🟢+",
            ChangeIndicator::Flat => "🔸+",
            ChangeIndicator::Down => "🔻",
            ChangeIndicator::Unknown => "❔",
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationPayload — What the core hands to a notifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub channel: String,
    pub title: String,
    pub tags: Vec<String>,
    pub today_rate_display: String,
    pub change_indicator: ChangeIndicator,
    pub historical_avg_display: String,
    pub action_url: String,
}
