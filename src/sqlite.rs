// SQLite-backed key-value table

use crate::backend::Backend;
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

pub struct SqliteBackend {
    db: Connection,
}

impl SqliteBackend {
    /// Open or create a database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }
        let db = Connection::open(path).context("Failed to open SQLite database")?;
        Self::from_connection(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        Self::from_connection(db)
    }

    fn from_connection(db: Connection) -> Result<Self> {
        let backend = Self { db };
        backend.create_schema()?;
        Ok(backend)
    }

    /// Get a reference to the SQLite database connection
    pub fn db(&self) -> &Connection {
        &self.db
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating kv schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl Backend for SqliteBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, chrono::Utc::now().timestamp_millis()],
            )
            .context("Failed to write key")?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.db
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .context("Failed to remove key")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_database() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("data/todos.db");

        let _backend = SqliteBackend::open(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_write_read_remove() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        assert_eq!(backend.read("todos").unwrap(), None);

        backend.write("todos", "[]").unwrap();
        backend.write("todos", "[{}]").unwrap();
        assert_eq!(backend.read("todos").unwrap().as_deref(), Some("[{}]"));

        let rows: i64 = backend.db().query_row("SELECT COUNT(*) FROM kv", [], |r| r.get(0)).unwrap();
        assert_eq!(rows, 1);

        backend.remove("todos").unwrap();
        assert_eq!(backend.read("todos").unwrap(), None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("todos.db");

        {
            let mut backend = SqliteBackend::open(&db_path).unwrap();
            backend.write("k", "v").unwrap();
        }

        let backend = SqliteBackend::open(&db_path).unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v"));
    }
}
