//! `SQLite` database connection.
//!
//! The database lives at `~/.pomo/pomo.db` and holds the session history
//! and the per-user stats cache. A running `pomo timer` and a `pomo session`
//! command in another terminal may hold it open at the same time, so file
//! databases use WAL and wait on a locked writer instead of failing.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::config::Paths;
use crate::error::PomoError;

use super::migrations;

/// How long a write waits for another process's lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// An open, migrated session database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `pomo.db` under the pomo home directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory or database cannot be created,
    /// or the schema cannot be brought up to date.
    pub fn open() -> Result<Self, PomoError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open a database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, PomoError> {
        let conn = Connection::open(path).map_err(|e| {
            PomoError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| PomoError::Database(format!("Failed to enable WAL: {e}")))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| PomoError::Database(format!("Failed to set busy timeout: {e}")))?;

        tracing::debug!(path = %path.display(), "opened database");
        Self::migrate(conn)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, PomoError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            PomoError::Database(format!("Failed to open in-memory database: {e}"))
        })?;
        Self::migrate(conn)
    }

    fn migrate(conn: Connection) -> Result<Self, PomoError> {
        migrations::run(&conn)?;
        Ok(Self { conn })
    }

    /// Schema version recorded in `PRAGMA user_version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be read.
    pub fn schema_version(&self) -> Result<i32, PomoError> {
        migrations::get_version(&self.conn)
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_is_migrated() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), migrations::CURRENT_VERSION);
    }

    #[test]
    fn test_file_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pomo.db");

        {
            let db = Database::open_at(&path).unwrap();
            db.connection()
                .execute(
                    "INSERT INTO user_stats (user_id, document, stale, updated_at)
                     VALUES ('ada', '{}', 1, '2024-03-10T09:00:00Z')",
                    [],
                )
                .unwrap();
        }

        let db = Database::open_at(&path).unwrap();
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM user_stats", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(db.schema_version().unwrap(), migrations::CURRENT_VERSION);
    }

    #[test]
    fn test_file_uses_wal() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = Database::open_at(&dir.path().join("pomo.db")).unwrap();
        let mode: String = db
            .connection()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
