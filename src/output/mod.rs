//! Output formatting for pomo.
//!
//! Every command renders through here, either as colored text or as JSON.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::PomoError;
use crate::features::sessions::{SessionPage, SessionRecord};
use crate::features::stats::{OverallStats, Rollup, StreakSummary};

pub use json::*;
pub use pretty::*;

/// Format a single session based on output format
///
/// # Errors
///
/// Returns `PomoError::Parse` if JSON serialization fails.
pub fn format_session(record: &SessionRecord, format: OutputFormat) -> Result<String, PomoError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(record)),
        OutputFormat::Json => to_json(record),
    }
}

/// Format a page of sessions based on output format
///
/// # Errors
///
/// Returns `PomoError::Parse` if JSON serialization fails.
pub fn format_page(page: &SessionPage, format: OutputFormat) -> Result<String, PomoError> {
    match format {
        OutputFormat::Pretty => Ok(format_page_pretty(page)),
        OutputFormat::Json => to_json(page),
    }
}

/// Format streaks based on output format
///
/// # Errors
///
/// Returns `PomoError::Parse` if JSON serialization fails.
pub fn format_streak(streak: &StreakSummary, format: OutputFormat) -> Result<String, PomoError> {
    match format {
        OutputFormat::Pretty => Ok(format_streak_pretty(streak)),
        OutputFormat::Json => format_streak_json(streak),
    }
}

/// Format a rollup based on output format
///
/// # Errors
///
/// Returns `PomoError::Parse` if JSON serialization fails.
pub fn format_rollup(rollup: &Rollup, format: OutputFormat) -> Result<String, PomoError> {
    match format {
        OutputFormat::Pretty => Ok(format_rollup_pretty(rollup)),
        OutputFormat::Json => format_rollup_json(rollup),
    }
}

/// Format lifetime stats based on output format
///
/// # Errors
///
/// Returns `PomoError::Parse` if JSON serialization fails.
pub fn format_overall(stats: &OverallStats, format: OutputFormat) -> Result<String, PomoError> {
    match format {
        OutputFormat::Pretty => Ok(format_overall_pretty(stats)),
        OutputFormat::Json => to_json(stats),
    }
}
