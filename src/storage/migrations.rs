//! Database migrations for pomo.
//!
//! Each migration upgrades the schema by one version; the version lives in
//! `PRAGMA user_version`. Migrations run when the database is opened.

use rusqlite::Connection;

use crate::error::PomoError;

/// Schema version this build writes.
pub(crate) const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 for a new database.
pub fn get_version(conn: &Connection) -> Result<i32, PomoError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| PomoError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), PomoError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| PomoError::Database(format!("Failed to set schema version: {e}")))
}

/// Bring the schema up to [`CURRENT_VERSION`].
///
/// Each step runs in its own transaction together with its version bump.
/// A database written by a newer pomo is refused rather than modified.
pub fn run(conn: &Connection) -> Result<(), PomoError> {
    let current = get_version(conn)?;
    if current > CURRENT_VERSION {
        return Err(PomoError::Database(format!(
            "Database schema v{current} is newer than this pomo supports (v{CURRENT_VERSION})"
        )));
    }

    for version in (current + 1)..=CURRENT_VERSION {
        tracing::info!(version, "running database migration");
        conn.execute_batch("BEGIN;")
            .map_err(|e| PomoError::Database(format!("Failed to begin migration: {e}")))?;

        let step = run_migration(conn, version).and_then(|()| set_version(conn, version));
        if let Err(e) = step {
            conn.execute_batch("ROLLBACK;").ok();
            return Err(e);
        }

        conn.execute_batch("COMMIT;")
            .map_err(|e| PomoError::Database(format!("Failed to commit migration: {e}")))?;
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<(), PomoError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(PomoError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: sessions and the stats cache.
///
/// Timestamps are RFC 3339 UTC strings with a `Z` suffix, so string order is
/// chronological order.
fn migrate_v1(conn: &Connection) -> Result<(), PomoError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT,
            duration INTEGER NOT NULL,
            mode TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            rounds INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_user_start
        ON sessions(user_id, start_time DESC);

        CREATE INDEX IF NOT EXISTS idx_sessions_start
        ON sessions(start_time DESC);

        -- Derived aggregate per user; rebuilt from sessions when stale
        CREATE TABLE IF NOT EXISTS user_stats (
            user_id TEXT PRIMARY KEY,
            document TEXT NOT NULL,
            stale INTEGER NOT NULL DEFAULT 1,
            updated_at TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| PomoError::Database(format!("Migration v1 failed: {e}")))
}
