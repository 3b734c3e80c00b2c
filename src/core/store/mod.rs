//! SQLite-backed record store
//!
//! The store is the system of record for the catalog and production data:
//! - Size charts and their size entries
//! - Materials, categories, products and BOM lines
//! - Custom designs and production orders
//!
//! Unique keys are enforced by the schema and surface as
//! [`Error::Conflict`]; lookups of missing records surface as
//! [`Error::NotFound`]. Decimals are stored as canonical text so that
//! costs and lengths round-trip without floating-point error.

mod charts;
mod designs;
mod materials;
mod orders;
mod products;
mod schema;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{ffi, Connection, ErrorCode, Row};
use rust_decimal::Decimal;

use crate::core::error::{Error, Result};
use crate::core::identity::EntityId;
use crate::core::project::Project;

pub use orders::OrderFilter;
pub use products::{CountedTable, ProductFilter};

/// Store file location within a project
const STORE_FILE: &str = ".fwc/store.db";

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// The record store backed by SQLite
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the store for a project
    pub fn open(project: &Project) -> Result<Self> {
        Self::open_path(&project.root().join(STORE_FILE))
    }

    /// Open or create a store at an explicit path
    pub fn open_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory store (used by tests and dry runs)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Schema version recorded in the database
    pub fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?)
    }
}

/// Map a unique-constraint violation to a Conflict, pass other errors through
fn conflict_on_unique(err: rusqlite::Error, kind: &'static str, key: &str) -> Error {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        if failure.code == ErrorCode::ConstraintViolation
            && matches!(
                failure.extended_code,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            )
        {
            tracing::debug!(kind, key, "unique constraint violated");
            return Error::conflict(kind, key);
        }
    }
    Error::Database(err)
}

/// Turn QueryReturnedNoRows into a NotFound for the given record
fn not_found_on_empty(err: rusqlite::Error, kind: &'static str, key: &str) -> Error {
    match err {
        rusqlite::Error::QueryReturnedNoRows => Error::not_found(kind, key),
        other => Error::Database(other),
    }
}

/// Read a column holding a value with a `FromStr` impl (ids, enums)
fn parse_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid value '{}': {}", raw, e).into(),
        )
    })
}

fn opt_parse_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        raw.parse::<T>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Text,
                format!("invalid value '{}': {}", raw, e).into(),
            )
        })
    })
    .transpose()
}

fn decimal_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    parse_col::<Decimal>(row, idx)
}

fn opt_decimal_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    opt_parse_col::<Decimal>(row, idx)
}

fn id_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<EntityId> {
    parse_col::<EntityId>(row, idx)
}

fn json_col<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

fn to_json<T: serde::Serialize>(value: &T, field: &'static str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Decode {
        field,
        value: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory_initializes_schema() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_open_path_creates_parent_dirs() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/dir/store.db");
        let store = Store::open_path(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_only_unique_violations_become_conflicts() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn
            .execute_batch(
                "CREATE TABLE parent (id TEXT PRIMARY KEY);
                 CREATE TABLE child (id TEXT PRIMARY KEY, parent_id TEXT NOT NULL REFERENCES parent(id));
                 INSERT INTO parent (id) VALUES ('p1');",
            )
            .unwrap();

        let dup = store
            .conn
            .execute("INSERT INTO parent (id) VALUES ('p1')", [])
            .unwrap_err();
        assert!(conflict_on_unique(dup, "parent", "p1").is_conflict());

        let orphan = store
            .conn
            .execute("INSERT INTO child (id, parent_id) VALUES ('c1', 'missing')", [])
            .unwrap_err();
        assert!(matches!(
            conflict_on_unique(orphan, "child", "c1"),
            Error::Database(_)
        ));

        let null = store
            .conn
            .execute("INSERT INTO child (id, parent_id) VALUES ('c2', NULL)", [])
            .unwrap_err();
        assert!(matches!(
            conflict_on_unique(null, "child", "c2"),
            Error::Database(_)
        ));
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("store.db");
        drop(Store::open_path(&path).unwrap());
        let store = Store::open_path(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }
}
