//! Persisted viewing positions
//!
//! Positions live in a string key-value store, one key per pack:
//! `position_<resource id>`. The on-disk store is a SQLite database with the
//! same `ItemTable(key, value)` layout VS Code derived editors use for their
//! `state.vscdb` files.

use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::error::StoreError;

/// Prefix for per-pack position keys
pub const KEY_PREFIX: &str = "position_";

/// Derive the storage key for a resource id
pub fn storage_key(resource_id: &str) -> String {
    format!("{}{}", KEY_PREFIX, resource_id)
}

/// Inverse of [`storage_key`], `None` for foreign keys
pub fn resource_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(KEY_PREFIX)
}

/// Interpret a stored value as a position
///
/// Only non-negative decimal integers count; anything else reads as absent.
pub fn parse_position(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

/// String key-value storage surviving across sessions
pub trait PositionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Returns whether the key existed
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;

    /// All entries ordered by key
    fn entries(&self) -> Result<Vec<(String, String)>, StoreError>;
}

/// A persisted position for one pack
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SavedPosition {
    pub pack: String,
    pub position: usize,
}

/// List every well-formed persisted position in a store
pub fn saved_positions<S: PositionStore + ?Sized>(store: &S) -> Result<Vec<SavedPosition>, StoreError> {
    let positions = store
        .entries()?
        .into_iter()
        .filter_map(|(key, value)| {
            let pack = resource_id_from_key(&key)?.to_string();
            let position = parse_position(&value)?;
            Some(SavedPosition { pack, position })
        })
        .collect();
    Ok(positions)
}

/// SQLite-backed store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store database, creating parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }

        Self::init(Connection::open(path)?)
    }

    /// A store that lives only as long as the process
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS ItemTable (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB)",
            [],
        )?;
        Ok(Self { conn })
    }
}

impl PositionStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM ItemTable WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO ItemTable (key, value) VALUES (?1, ?2)",
            [key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM ItemTable WHERE key = ?1", [key])?;
        Ok(deleted > 0)
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM ItemTable ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// In-process store, counts writes
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PositionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes += 1;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.items.remove(key).is_some())
    }

    fn entries(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .items
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
