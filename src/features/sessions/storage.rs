//! Session storage.
//!
//! Persists session records to the local database. Every query is scoped to
//! one user; a record owned by someone else is indistinguishable from a
//! missing one.

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, Row};

use super::cache::StatsCache;
use super::record::{
    CompleteSession, HistoryFilter, NewSession, SessionHistory, SessionPage, SessionQuery,
    SessionRecord,
};
use crate::core::timestamp::{from_db, to_db};
use crate::core::Phase;
use crate::error::PomoError;
use crate::features::timer::PhaseCompletion;
use crate::storage::Database;

const COLUMNS: &str = "id, user_id, start_time, end_time, duration, mode, completed, rounds, \
                       notes, created_at, updated_at";

/// Storage for session records.
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    /// Open the store on the default database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn new() -> Result<Self, PomoError> {
        let db = Database::open()?;
        Ok(Self { db })
    }

    /// Create a store with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    pub(crate) const fn database(&self) -> &Database {
        &self.db
    }

    /// Create a session. It starts out not completed.
    ///
    /// # Errors
    ///
    /// Returns `PomoError::InvalidInput` for a zero duration, or a database
    /// error.
    pub fn create(&self, user: &str, session: &NewSession) -> Result<SessionRecord, PomoError> {
        session.validate()?;
        self.insert(
            user,
            &Insert {
                start: session.start_time,
                end: None,
                duration: session.duration_seconds,
                mode: session.mode,
                completed: false,
                rounds: 0,
                notes: session.notes.as_deref(),
            },
        )
    }

    /// Store a finished timer phase as a completed record.
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub fn record_completion(
        &self,
        user: &str,
        completion: &PhaseCompletion,
    ) -> Result<SessionRecord, PomoError> {
        self.insert(
            user,
            &Insert {
                start: completion.started_at,
                end: Some(Utc::now()),
                duration: completion.duration_seconds.max(1),
                mode: completion.finished,
                completed: true,
                rounds: completion.rounds_completed,
                notes: None,
            },
        )
    }

    fn insert(&self, user: &str, row: &Insert<'_>) -> Result<SessionRecord, PomoError> {
        let conn = self.db.connection();
        let now = to_db(&Utc::now());

        conn.execute(
            r"INSERT INTO sessions
              (user_id, start_time, end_time, duration, mode, completed, rounds, notes,
               created_at, updated_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                user,
                to_db(&row.start),
                row.end.as_ref().map(to_db),
                row.duration,
                row.mode.as_str(),
                row.completed,
                row.rounds,
                row.notes,
                now,
            ],
        )
        .map_err(|e| PomoError::Database(format!("Failed to insert session: {e}")))?;

        let id = conn.last_insert_rowid();
        self.mark_stats_stale(user)?;
        tracing::debug!(user, id, mode = %row.mode, completed = row.completed, "session stored");

        self.get(user, id)
    }

    /// Finish a session: set its end time, completion flag and notes.
    ///
    /// # Errors
    ///
    /// Returns `PomoError::NotFound` if the user has no such session.
    pub fn complete(
        &self,
        user: &str,
        id: i64,
        update: &CompleteSession,
    ) -> Result<SessionRecord, PomoError> {
        let conn = self.db.connection();

        let rows = conn
            .execute(
                r"UPDATE sessions SET
                  end_time = ?1,
                  completed = ?2,
                  notes = COALESCE(?3, notes),
                  updated_at = ?4
                  WHERE id = ?5 AND user_id = ?6",
                params![
                    to_db(&update.end_time),
                    update.completed,
                    update.notes,
                    to_db(&Utc::now()),
                    id,
                    user,
                ],
            )
            .map_err(|e| PomoError::Database(format!("Failed to update session: {e}")))?;

        if rows == 0 {
            return Err(self.not_found(user, id));
        }

        self.mark_stats_stale(user)?;
        self.get(user, id)
    }

    /// Look up a session the user owns.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails or the row is corrupt.
    pub fn find(&self, user: &str, id: i64) -> Result<Option<SessionRecord>, PomoError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM sessions WHERE id = ?1 AND user_id = ?2"
            ))
            .map_err(|e| PomoError::Database(format!("Failed to prepare query: {e}")))?;

        let raw = stmt
            .query_row(params![id, user], RawSession::from_row)
            .optional()
            .map_err(|e| PomoError::Database(format!("Failed to query session: {e}")))?;

        raw.map(|r| {
            r.decode()
                .map_err(|e| PomoError::Database(format!("Session {id} is corrupt: {e}")))
        })
        .transpose()
    }

    /// Get a session the user owns.
    ///
    /// # Errors
    ///
    /// Returns `PomoError::NotFound` if the user has no such session.
    pub fn get(&self, user: &str, id: i64) -> Result<SessionRecord, PomoError> {
        self.find(user, id)?.ok_or_else(|| self.not_found(user, id))
    }

    /// Delete a session the user owns.
    ///
    /// # Errors
    ///
    /// Returns `PomoError::NotFound` if the user has no such session.
    pub fn delete(&self, user: &str, id: i64) -> Result<(), PomoError> {
        let conn = self.db.connection();

        let rows = conn
            .execute(
                "DELETE FROM sessions WHERE id = ?1 AND user_id = ?2",
                params![id, user],
            )
            .map_err(|e| PomoError::Database(format!("Failed to delete session: {e}")))?;

        if rows == 0 {
            return Err(self.not_found(user, id));
        }

        self.mark_stats_stale(user)?;
        tracing::debug!(user, id, "session deleted");
        Ok(())
    }

    /// List one page of sessions, newest first.
    ///
    /// Rows that cannot be decoded are left out of the page but still count
    /// towards `total`.
    ///
    /// # Errors
    ///
    /// Returns `PomoError::InvalidInput` for a zero page or limit.
    pub fn list(&self, user: &str, query: &SessionQuery) -> Result<SessionPage, PomoError> {
        query.validate()?;
        let conn = self.db.connection();

        let (clause, mut values) = filter_clause(
            user,
            &HistoryFilter {
                mode: query.mode,
                completed: query.completed,
                since: None,
            },
        );

        let total: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM sessions WHERE {clause}"),
                rusqlite::params_from_iter(values.iter()),
                |row| row.get(0),
            )
            .map_err(|e| PomoError::Database(format!("Failed to count sessions: {e}")))?;

        let total = u64::try_from(total).unwrap_or(0);
        let total_pages = u32::try_from(total.div_ceil(u64::from(query.limit))).unwrap_or(u32::MAX);

        let limit = i64::from(query.limit);
        // An offset past i64 is past any table; the page is simply empty.
        let sessions = match limit.checked_mul(i64::from(query.page) - 1) {
            Some(offset) => {
                values.push(Value::Integer(limit));
                values.push(Value::Integer(offset));
                self.query_history(
                    &format!(
                        "SELECT {COLUMNS} FROM sessions WHERE {clause}
                         ORDER BY start_time DESC, id DESC
                         LIMIT ? OFFSET ?"
                    ),
                    values,
                )?
                .records
            }
            None => Vec::new(),
        };

        Ok(SessionPage {
            sessions,
            total_pages,
            current_page: query.page,
            total,
        })
    }

    /// Load a user's full history, newest first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails. Undecodable rows are
    /// counted in `invalid` rather than failing the call.
    pub fn history(&self, user: &str, filter: &HistoryFilter) -> Result<SessionHistory, PomoError> {
        let (clause, values) = filter_clause(user, filter);
        self.query_history(
            &format!(
                "SELECT {COLUMNS} FROM sessions WHERE {clause}
                 ORDER BY start_time DESC, id DESC"
            ),
            values,
        )
    }

    fn query_history(&self, sql: &str, values: Vec<Value>) -> Result<SessionHistory, PomoError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| PomoError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params_from_iter(values), RawSession::from_row)
            .map_err(|e| PomoError::Database(format!("Failed to query sessions: {e}")))?;

        let mut history = SessionHistory::default();
        for row in rows {
            let raw = match row {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable session row");
                    history.invalid += 1;
                    continue;
                }
            };
            let id = raw.id;
            match raw.decode() {
                Ok(record) => history.records.push(record),
                Err(reason) => {
                    tracing::warn!(id, %reason, "skipping invalid session");
                    history.invalid += 1;
                }
            }
        }

        Ok(history)
    }

    fn mark_stats_stale(&self, user: &str) -> Result<(), PomoError> {
        StatsCache::new(self).invalidate(user)
    }

    fn not_found(&self, user: &str, id: i64) -> PomoError {
        let owner: Option<String> = self
            .db
            .connection()
            .query_row("SELECT user_id FROM sessions WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()
            .ok()
            .flatten();

        if owner.is_some_and(|o| o != user) {
            tracing::warn!(user, id, "rejected access to another user's session");
        }

        PomoError::NotFound(format!("Session {id}"))
    }

    /// Delete all sessions (for testing).
    #[cfg(test)]
    pub fn delete_all(&self) -> Result<(), PomoError> {
        self.db
            .connection()
            .execute("DELETE FROM sessions", [])
            .map_err(|e| PomoError::Database(format!("Failed to delete sessions: {e}")))?;
        Ok(())
    }
}

struct Insert<'a> {
    start: chrono::DateTime<Utc>,
    end: Option<chrono::DateTime<Utc>>,
    duration: u32,
    mode: Phase,
    completed: bool,
    rounds: u32,
    notes: Option<&'a str>,
}

/// Build a `WHERE` clause and its positional values.
fn filter_clause(user: &str, filter: &HistoryFilter) -> (String, Vec<Value>) {
    let mut clauses = vec!["user_id = ?"];
    let mut values = vec![Value::Text(user.to_string())];

    if let Some(mode) = filter.mode {
        clauses.push("mode = ?");
        values.push(Value::Text(mode.as_str().to_string()));
    }
    if let Some(completed) = filter.completed {
        clauses.push("completed = ?");
        values.push(Value::Integer(i64::from(completed)));
    }
    if let Some(since) = filter.since {
        clauses.push("start_time >= ?");
        values.push(Value::Text(to_db(&since)));
    }

    (clauses.join(" AND "), values)
}

/// A row as stored, before validation.
struct RawSession {
    id: i64,
    user_id: String,
    start_time: String,
    end_time: Option<String>,
    duration: i64,
    mode: String,
    completed: bool,
    rounds: i64,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RawSession {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
            duration: row.get(4)?,
            mode: row.get(5)?,
            completed: row.get(6)?,
            rounds: row.get(7)?,
            notes: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn decode(self) -> Result<SessionRecord, String> {
        let timestamp = |field: &str, value: &str| {
            from_db(value).ok_or_else(|| format!("bad {field} '{value}'"))
        };

        let duration_seconds = u32::try_from(self.duration)
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| format!("non-positive duration {}", self.duration))?;
        let mode = Phase::parse(&self.mode).map_err(|e| e.to_string())?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|s| timestamp("end_time", s))
            .transpose()?;

        Ok(SessionRecord {
            id: self.id,
            start_time: timestamp("start_time", &self.start_time)?,
            end_time,
            duration_seconds,
            mode,
            completed: self.completed,
            rounds: u32::try_from(self.rounds).unwrap_or(0),
            notes: self.notes,
            created_at: timestamp("created_at", &self.created_at)?,
            updated_at: timestamp("updated_at", &self.updated_at)?,
            user_id: self.user_id,
        })
    }
}

trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
