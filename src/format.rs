//! Pure presentation of [`RateData`]: display strings and notification payloads.

use crate::config::CurrencyMetadata;
use crate::models::{ChangeIndicator, Metric, NotificationPayload, RateData};

pub const NOT_AVAILABLE: &str = "n/a";

/// Render a metric without trailing zeros, using `n/a` for undefined values.
pub fn display_metric(metric: Metric) -> String {
    match metric.value() {
        Some(v) => v.normalize().to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `"{symbol} {rate} ({marker}{change})"`, e.g. `₹ 61.234 (🟢+0.2)`.
pub fn today_rate_display(data: &RateData) -> String {
    let indicator = ChangeIndicator::from_change(data.change_since_yesterday);
    format!(
        "{} {} ({}{})",
        data.target_symbol,
        data.today_rate.normalize(),
        indicator.marker(),
        display_metric(data.change_since_yesterday)
    )
}

/// `"{symbol} {avg}"`, e.g. `RM 3.402`.
pub fn historical_avg_display(data: &RateData) -> String {
    format!("{} {}", data.target_symbol, display_metric(data.last_week_avg))
}

pub fn title(data: &RateData) -> String {
    format!("{}-{} exchange rate", data.base_currency, data.target_currency)
}

/// Assemble the notification payload for one currency.
pub fn build_payload(data: &RateData, meta: &CurrencyMetadata) -> NotificationPayload {
    NotificationPayload {
        channel: meta.notification_topic.clone(),
        title: title(data),
        tags: vec![meta.tag.clone()],
        today_rate_display: today_rate_display(data),
        change_indicator: ChangeIndicator::from_change(data.change_since_yesterday),
        historical_avg_display: historical_avg_display(data),
        action_url: meta.reference_url.clone(),
    }
}

/// Two-line message body shown in the notification.
pub fn message(payload: &NotificationPayload) -> String {
    format!(
        "Today's rate        | {}\nLast week's avg  | {}\n",
        payload.today_rate_display, payload.historical_avg_display
    )
}
