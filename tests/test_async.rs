//! Async wrapper tests (requires the `async` feature).

#![cfg(feature = "async")]

mod common;

use chrono::{TimeZone, Utc};
use common::{dec, RecordingNotifier, StubProvider};
use fx_digest::{AsyncRateTracker, MemoryStore, Metric, RateTracker, RunOptions};

fn tracker(notifier: RecordingNotifier) -> AsyncRateTracker {
    let inner = RateTracker::builder()
        .store(MemoryStore::new())
        .provider(StubProvider::new(&[("INR", "60.5"), ("MYR", "3.4")]))
        .notifier(notifier)
        .build()
        .unwrap();
    AsyncRateTracker::from_tracker(inner)
}

#[tokio::test]
async fn run_all_executes_on_blocking_pool() {
    let notifier = RecordingNotifier::default();
    let tracker = tracker(notifier.clone());
    let now = Utc.with_ymd_and_hms(2024, 6, 4, 4, 0, 0).unwrap();

    let report = tracker.run_all(RunOptions::default(), now).await.unwrap();
    assert!(report.all_succeeded());
    assert_eq!(notifier.sent().len(), 2);

    let records = tracker
        .run(|t| t.history("INR", None, None))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, "2024-06-04");
}

#[tokio::test]
async fn process_sees_previous_day() {
    let tracker = tracker(RecordingNotifier::default());
    let day1 = Utc.with_ymd_and_hms(2024, 6, 3, 4, 0, 0).unwrap();
    let day2 = Utc.with_ymd_and_hms(2024, 6, 4, 4, 0, 0).unwrap();

    tracker.process("INR", RunOptions::default(), day1).await.unwrap();
    let outcome = tracker.process("INR", RunOptions::default(), day2).await.unwrap();
    assert_eq!(outcome.data.change_since_yesterday, Metric::Value(dec("0")));
    assert_eq!(outcome.data.last_week_avg, Metric::Value(dec("60.5")));
}
