//! Cached per-user aggregate.
//!
//! The `user_stats` table holds the last computed [`OverallStats`] for each
//! user as JSON. Any write to a user's sessions marks the row stale; the next
//! read recomputes it from history. The stored document is never the source
//! of truth.

use chrono::Utc;
use rusqlite::params;

use super::record::HistoryFilter;
use super::storage::SessionStore;
use crate::core::timestamp::to_db;
use crate::error::PomoError;
use crate::features::stats::OverallStats;

/// Read-through cache of [`OverallStats`].
pub struct StatsCache<'a> {
    store: &'a SessionStore,
}

impl<'a> StatsCache<'a> {
    #[must_use]
    pub const fn new(store: &'a SessionStore) -> Self {
        Self { store }
    }

    /// Aggregate stats for `user`, recomputed if the cached copy is stale or
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns a database error if history cannot be loaded or the cache
    /// cannot be written.
    pub fn overall(&self, user: &str) -> Result<OverallStats, PomoError> {
        if let Some(stats) = self.cached(user)? {
            tracing::debug!(user, "stats cache hit");
            return Ok(stats);
        }

        tracing::debug!(user, "recomputing stats");
        let history = self.store.history(user, &HistoryFilter::default())?;
        let mut stats = OverallStats::compute(&history.records);
        stats.skipped += history.invalid;

        self.put(user, &stats)?;
        Ok(stats)
    }

    /// Mark `user`'s cached stats stale.
    ///
    /// # Errors
    ///
    /// Returns a database error if the update fails.
    pub fn invalidate(&self, user: &str) -> Result<(), PomoError> {
        self.store
            .database()
            .connection()
            .execute("UPDATE user_stats SET stale = 1 WHERE user_id = ?1", [user])
            .map_err(|e| PomoError::Database(format!("Failed to invalidate stats: {e}")))?;
        Ok(())
    }

    /// The fresh cached document, if any. A document that no longer parses
    /// is treated as missing.
    fn cached(&self, user: &str) -> Result<Option<OverallStats>, PomoError> {
        let conn = self.store.database().connection();

        let mut stmt = conn
            .prepare("SELECT document FROM user_stats WHERE user_id = ?1 AND stale = 0")
            .map_err(|e| PomoError::Database(format!("Failed to prepare query: {e}")))?;

        let mut rows = stmt
            .query([user])
            .map_err(|e| PomoError::Database(format!("Failed to query stats: {e}")))?;

        let Some(row) = rows
            .next()
            .map_err(|e| PomoError::Database(format!("Failed to read stats: {e}")))?
        else {
            return Ok(None);
        };

        let document: String = row
            .get(0)
            .map_err(|e| PomoError::Database(format!("Failed to read stats: {e}")))?;

        match serde_json::from_str(&document) {
            Ok(stats) => Ok(Some(stats)),
            Err(e) => {
                tracing::warn!(user, error = %e, "discarding unreadable stats cache");
                Ok(None)
            }
        }
    }

    fn put(&self, user: &str, stats: &OverallStats) -> Result<(), PomoError> {
        let document = serde_json::to_string(stats)?;

        self.store
            .database()
            .connection()
            .execute(
                r"INSERT INTO user_stats (user_id, document, stale, updated_at)
                  VALUES (?1, ?2, 0, ?3)
                  ON CONFLICT(user_id) DO UPDATE SET
                    document = excluded.document,
                    stale = 0,
                    updated_at = excluded.updated_at",
                params![user, document, to_db(&Utc::now())],
            )
            .map_err(|e| PomoError::Database(format!("Failed to store stats: {e}")))?;

        Ok(())
    }
}
