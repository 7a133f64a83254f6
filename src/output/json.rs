//! JSON output formatting for pomo.
//!
//! Shapes are kept stable for scripts that consume them:
//! rollups are bare arrays of period documents, streaks are
//! `{currentStreak, longestStreak}` and session pages are
//! `{sessions, totalPages, currentPage, total}`.

use serde::Serialize;
use serde_json::json;

use crate::error::PomoError;
use crate::features::stats::{Rollup, StreakSummary};

/// Format a rollup as a JSON array of periods
///
/// # Errors
///
/// Returns `PomoError::Parse` if JSON serialization fails.
pub fn format_rollup_json(rollup: &Rollup) -> Result<String, PomoError> {
    to_json(&rollup.periods)
}

/// Format a streak summary as JSON
///
/// # Errors
///
/// Returns `PomoError::Parse` if JSON serialization fails.
pub fn format_streak_json(streak: &StreakSummary) -> Result<String, PomoError> {
    to_json(streak)
}

/// Format a deletion confirmation as JSON
///
/// # Errors
///
/// Returns `PomoError::Parse` if JSON serialization fails.
pub fn format_deleted_json(id: i64) -> Result<String, PomoError> {
    to_json(&json!({ "message": "Session deleted successfully", "id": id }))
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `PomoError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, PomoError> {
    Ok(serde_json::to_string_pretty(value)?)
}
