//! SQLite-backed key-value storage

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::StorageError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

type Result<T> = std::result::Result<T, StorageError>;

/// Durable store in a single SQLite file
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the store at the default data location
    pub fn open() -> Result<Self> {
        let data_dir = Self::data_dir()?;
        Self::open_at(&data_dir)
    }

    /// Get the state directory path (~/.local/share/pgctl on Linux)
    pub fn data_dir() -> Result<PathBuf> {
        let base = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(base.join("pgctl"))
    }

    /// Open the store inside a specific directory
    pub fn open_at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| StorageError::Io(format!("Failed to create state dir: {}", e)))?;

        let db_path = dir.join("state.db");
        let conn = Connection::open(&db_path)?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "State schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            std::fs::remove_file(&db_path)
                .map_err(|e| StorageError::Io(format!("Failed to remove state db: {}", e)))?;
            return Self::open_at(dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute("DELETE FROM kv_entries WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() {
        let temp = tempdir().unwrap();

        {
            let store = SqliteStore::open_at(temp.path()).unwrap();
            store.set("selectedPgId", "pg-2").unwrap();
        }

        let store = SqliteStore::open_at(temp.path()).unwrap();
        assert_eq!(store.get("selectedPgId").unwrap().as_deref(), Some("pg-2"));
    }

    #[test]
    fn test_set_overwrites_and_remove_deletes() {
        let temp = tempdir().unwrap();
        let store = SqliteStore::open_at(temp.path()).unwrap();

        store.set("k", "a").unwrap();
        store.set("k", "b").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("b"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Removing a missing key is not an error
        store.remove("k").unwrap();
    }

    #[test]
    fn test_schema_mismatch_rebuilds() {
        let temp = tempdir().unwrap();
        {
            let conn = Connection::open(temp.path().join("state.db")).unwrap();
            conn.pragma_update(None, "user_version", 99).unwrap();
        }

        let store = SqliteStore::open_at(temp.path()).unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
