//! Lifetime aggregate for one user.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::streak::compute_streaks_in;
use crate::core::Phase;
use crate::features::sessions::SessionRecord;

/// Lifetime totals over a user's completed sessions. All times in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_work_sessions: u32,
    pub total_work_time: u64,
    pub total_break_time: u64,
    pub total_long_break_time: u64,
    /// Sum of the `rounds` field over completed records
    pub total_rounds: u64,
    /// Mean work session length, rounded
    pub average_session_length: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// End (or start) of the latest completed session
    pub last_active: Option<DateTime<Utc>>,
    /// Records ignored as malformed
    #[serde(default)]
    pub skipped: usize,
}

impl OverallStats {
    /// Compute from a newest-first history using local calendar days.
    #[must_use]
    pub fn compute(records: &[SessionRecord]) -> Self {
        Self::compute_in(records, &Local)
    }

    /// Compute from a newest-first history using calendar days in `tz`.
    #[must_use]
    pub fn compute_in<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> Self {
        let streaks = compute_streaks_in(records, tz);
        let mut stats = Self {
            current_streak: streaks.current_streak,
            longest_streak: streaks.longest_streak,
            skipped: streaks.skipped,
            ..Self::default()
        };

        for record in records.iter().filter(|r| r.completed) {
            if record.duration_seconds == 0 {
                // Work records were already counted by the streak pass
                if record.mode != Phase::Work {
                    stats.skipped += 1;
                }
                continue;
            }

            let seconds = u64::from(record.duration_seconds);
            match record.mode {
                Phase::Work => {
                    stats.total_work_sessions += 1;
                    stats.total_work_time += seconds;
                }
                Phase::Break => stats.total_break_time += seconds,
                Phase::LongBreak => stats.total_long_break_time += seconds,
            }
            stats.total_rounds += u64::from(record.rounds);

            let active = record.end_time.unwrap_or(record.start_time);
            stats.last_active = Some(stats.last_active.map_or(active, |last| last.max(active)));
        }

        if stats.total_work_sessions > 0 {
            let sessions = u64::from(stats.total_work_sessions);
            stats.average_session_length = (stats.total_work_time + sessions / 2) / sessions;
        }

        stats
    }
}
