//! DuckDB-backed time-series store.
//!
//! All collections share one table keyed by `(collection, date)`. Rates are
//! stored as a JSON object so a document can later carry more than one
//! currency without a schema change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use duckdb::Connection as DuckDbConnection;
use log::debug;
use rust_decimal::Decimal;

use super::{validate_collection, validate_date_key, TimeSeriesStore};
use crate::error::Result;
use crate::models::RateRecord;
use crate::sql_builder::SqlBuilder;

const TABLE: &str = "rate_records";

/// Wraps a DuckDB connection holding the `rate_records` table.
pub struct DuckDbStore {
    conn: DuckDbConnection,
    path: Option<PathBuf>,
}

impl DuckDbStore {
    /// Open (or create) a database file.
    ///
    /// Creates the parent directory if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = DuckDbConnection::open(&path)?;
        let store = Self {
            conn,
            path: Some(path),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Database file path, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (\
               collection VARCHAR NOT NULL, \
               date VARCHAR NOT NULL, \
               rates VARCHAR NOT NULL, \
               PRIMARY KEY (collection, date))",
            TABLE
        ))?;
        Ok(())
    }

    /// Run a `(date, rates)` query and decode each row into a [`RateRecord`].
    fn query_records(&self, sql: &str, params: &[String]) -> Result<Vec<RateRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let date: String = row.get(0)?;
            let raw: String = row.get(1)?;
            let rates: BTreeMap<String, Decimal> = serde_json::from_str(&raw)?;
            out.push(RateRecord::new(date, rates));
        }
        Ok(out)
    }

    /// Names of all collections that hold at least one record.
    pub fn collections(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT collection FROM {} ORDER BY collection",
            TABLE
        ))?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(row.get::<_, String>(0)?);
        }
        Ok(out)
    }

    /// Number of records stored in a collection.
    pub fn count(&self, collection: &str) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT COUNT(*) FROM {} WHERE collection = ?", TABLE))?;
        let mut rows = stmt.query([collection])?;
        let count = match rows.next()? {
            Some(row) => row.get::<_, i64>(0)?,
            None => 0,
        };
        Ok(count.max(0) as usize)
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

impl TimeSeriesStore for DuckDbStore {
    fn upsert(&self, collection: &str, date: &str, rates: &BTreeMap<String, Decimal>) -> Result<()> {
        validate_collection(collection)?;
        validate_date_key(date)?;
        let payload = serde_json::to_string(rates)?;
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (collection, date, rates) VALUES (?, ?, ?)",
                TABLE
            ),
            [collection, date, payload.as_str()],
        )?;
        debug!("Upserted {}/{} -> {}", collection, date, payload);
        Ok(())
    }

    fn get(&self, collection: &str, date: &str) -> Result<Option<RateRecord>> {
        validate_collection(collection)?;
        validate_date_key(date)?;
        let (sql, params) = SqlBuilder::new(TABLE)
            .select(&["date", "rates"])
            .where_eq("collection", collection)
            .where_eq("date", date)
            .limit(1)
            .build();
        Ok(self.query_records(&sql, &params)?.into_iter().next())
    }

    fn range_scan(&self, collection: &str, start: &str, end: &str) -> Result<Vec<RateRecord>> {
        validate_collection(collection)?;
        validate_date_key(start)?;
        validate_date_key(end)?;
        let (sql, params) = SqlBuilder::new(TABLE)
            .select(&["date", "rates"])
            .where_eq("collection", collection)
            .where_gte("date", start)
            .where_lte("date", end)
            .order_by(&["date ASC"])
            .build();
        let records = self.query_records(&sql, &params)?;
        debug!(
            "Range scan {} [{}, {}] returned {} record(s)",
            collection,
            start,
            end,
            records.len()
        );
        Ok(records)
    }
}
