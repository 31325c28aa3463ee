//! Store contract tests, run against both the DuckDB and in-memory stores.

mod common;

use common::{dec, rates, seed, INR_COLLECTION, MYR_COLLECTION};
use fx_digest::{DuckDbStore, FxError, MemoryStore, TimeSeriesStore};

fn duckdb() -> DuckDbStore {
    DuckDbStore::open_in_memory().unwrap()
}

// ---------------------------------------------------------------------------
// upsert
// ---------------------------------------------------------------------------

fn check_upsert_replaces(store: &dyn TimeSeriesStore) {
    store
        .upsert(INR_COLLECTION, "2024-06-04", &rates("INR", "60.5"))
        .unwrap();
    store
        .upsert(INR_COLLECTION, "2024-06-04", &rates("INR", "60.7"))
        .unwrap();

    let records = store
        .range_scan(INR_COLLECTION, "2024-06-04", "2024-06-04")
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rate("INR"), Some(dec("60.7")));
}

#[test]
fn duckdb_upsert_same_day_replaces() {
    check_upsert_replaces(&duckdb());
}

#[test]
fn memory_upsert_same_day_replaces() {
    check_upsert_replaces(&MemoryStore::new());
}

fn check_upsert_replaces_whole_record(store: &dyn TimeSeriesStore) {
    let mut both = rates("INR", "60.5");
    both.insert("MYR".to_string(), dec("3.4"));
    store.upsert(INR_COLLECTION, "2024-06-04", &both).unwrap();
    store
        .upsert(INR_COLLECTION, "2024-06-04", &rates("INR", "60.6"))
        .unwrap();

    let record = store.get(INR_COLLECTION, "2024-06-04").unwrap().unwrap();
    assert_eq!(record.rate("INR"), Some(dec("60.6")));
    assert_eq!(record.rate("MYR"), None);
}

#[test]
fn duckdb_upsert_does_not_merge_fields() {
    check_upsert_replaces_whole_record(&duckdb());
}

#[test]
fn memory_upsert_does_not_merge_fields() {
    check_upsert_replaces_whole_record(&MemoryStore::new());
}

#[test]
fn upsert_rejects_malformed_date_keys() {
    let store = duckdb();
    for bad in ["2024-6-4", "04-06-2024", "2024-06-31", ""] {
        let err = store
            .upsert(INR_COLLECTION, bad, &rates("INR", "60.5"))
            .unwrap_err();
        assert!(matches!(err, FxError::InvalidArgument(_)), "{bad}: {err}");
    }
}

#[test]
fn upsert_rejects_empty_collection() {
    let err = MemoryStore::new()
        .upsert(" ", "2024-06-04", &rates("INR", "60.5"))
        .unwrap_err();
    assert!(matches!(err, FxError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// get
// ---------------------------------------------------------------------------

fn check_get(store: &dyn TimeSeriesStore) {
    seed(store, INR_COLLECTION, "INR", &[("2024-06-03", "60.3")]);

    let found = store.get(INR_COLLECTION, "2024-06-03").unwrap().unwrap();
    assert_eq!(found.date, "2024-06-03");
    assert_eq!(found.rate("INR"), Some(dec("60.3")));

    assert!(store.get(INR_COLLECTION, "2024-06-02").unwrap().is_none());
    assert!(store.get(MYR_COLLECTION, "2024-06-03").unwrap().is_none());
}

#[test]
fn duckdb_get_returns_absent_as_none() {
    check_get(&duckdb());
}

#[test]
fn memory_get_returns_absent_as_none() {
    check_get(&MemoryStore::new());
}

// ---------------------------------------------------------------------------
// range_scan
// ---------------------------------------------------------------------------

fn check_range_scan(store: &dyn TimeSeriesStore) {
    // Inserted out of order, with the endpoints' neighbours present.
    seed(
        store,
        INR_COLLECTION,
        "INR",
        &[
            ("2024-06-05", "60.5"),
            ("2024-06-08", "60.8"),
            ("2024-06-01", "60.1"),
            ("2024-06-07", "60.7"),
            ("2024-05-31", "59.9"),
            ("2024-06-03", "60.3"),
        ],
    );
    seed(store, MYR_COLLECTION, "MYR", &[("2024-06-04", "3.4")]);

    let records = store
        .range_scan(INR_COLLECTION, "2024-06-01", "2024-06-07")
        .unwrap();
    let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(
        dates,
        vec!["2024-06-01", "2024-06-03", "2024-06-05", "2024-06-07"]
    );
}

#[test]
fn duckdb_range_scan_is_inclusive_and_ordered() {
    check_range_scan(&duckdb());
}

#[test]
fn memory_range_scan_is_inclusive_and_ordered() {
    check_range_scan(&MemoryStore::new());
}

fn check_range_scan_empty(store: &dyn TimeSeriesStore) {
    assert!(store
        .range_scan(INR_COLLECTION, "2024-06-01", "2024-06-07")
        .unwrap()
        .is_empty());

    seed(store, INR_COLLECTION, "INR", &[("2024-06-03", "60.3")]);
    // Inverted bounds match nothing.
    assert!(store
        .range_scan(INR_COLLECTION, "2024-06-07", "2024-06-01")
        .unwrap()
        .is_empty());
}

#[test]
fn duckdb_range_scan_may_be_empty() {
    check_range_scan_empty(&duckdb());
}

#[test]
fn memory_range_scan_may_be_empty() {
    check_range_scan_empty(&MemoryStore::new());
}

// ---------------------------------------------------------------------------
// DuckDB file persistence
// ---------------------------------------------------------------------------

#[test]
fn duckdb_file_store_persists_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("rates.duckdb");

    {
        let store = DuckDbStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        seed(
            &store,
            INR_COLLECTION,
            "INR",
            &[("2024-06-01", "60.1"), ("2024-06-02", "60.2")],
        );
        seed(&store, MYR_COLLECTION, "MYR", &[("2024-06-01", "3.41")]);
    }

    let store = DuckDbStore::open(&path).unwrap();
    assert_eq!(store.count(INR_COLLECTION).unwrap(), 2);
    assert_eq!(store.count(MYR_COLLECTION).unwrap(), 1);
    assert_eq!(store.count("unknown").unwrap(), 0);
    assert_eq!(
        store.collections().unwrap(),
        vec![INR_COLLECTION.to_string(), MYR_COLLECTION.to_string()]
    );
    let record = store.get(MYR_COLLECTION, "2024-06-01").unwrap().unwrap();
    assert_eq!(record.rate("MYR"), Some(dec("3.41")));
}

#[test]
fn memory_store_counts_records() {
    let store = MemoryStore::new();
    seed(
        &store,
        INR_COLLECTION,
        "INR",
        &[("2024-06-01", "60.1"), ("2024-06-01", "60.2")],
    );
    assert_eq!(store.count(INR_COLLECTION), 1);
    assert_eq!(store.count(MYR_COLLECTION), 0);
}
