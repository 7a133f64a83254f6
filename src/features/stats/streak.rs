//! Daily streaks of completed work sessions.

use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::features::sessions::SessionRecord;

/// Current and longest streak, in days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Records ignored as malformed
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Compute streaks using local calendar days.
///
/// See [`compute_streaks_in`].
#[must_use]
pub fn compute_streaks(records: &[SessionRecord]) -> StreakSummary {
    compute_streaks_in(records, &Local)
}

/// Compute streaks using calendar days in `tz`.
///
/// `records` must be sorted by start time, newest first. Only completed
/// Work sessions count. The current streak is the run of consecutive days
/// ending at the most recent counted day; once a gap is seen it stays at
/// the length reached before the gap.
///
/// A record whose day is later than the previously counted day, or whose
/// duration is zero, is treated as absent and counted in `skipped`.
#[must_use]
pub fn compute_streaks_in<Tz: TimeZone>(records: &[SessionRecord], tz: &Tz) -> StreakSummary {
    let mut summary = StreakSummary::default();
    let mut previous: Option<NaiveDate> = None;
    let mut run = 0u32;
    let mut locked = false;

    for record in records.iter().filter(|r| r.is_completed_work()) {
        if record.duration_seconds == 0 {
            summary.skipped += 1;
            continue;
        }

        let day = record.start_time.with_timezone(tz).date_naive();
        let Some(prev) = previous else {
            previous = Some(day);
            run = 1;
            summary.current_streak = 1;
            summary.longest_streak = 1;
            continue;
        };

        match (prev - day).num_days() {
            0 => {}
            1 => {
                run += 1;
                summary.longest_streak = summary.longest_streak.max(run);
                if !locked {
                    summary.current_streak = run;
                }
            }
            gap if gap > 1 => {
                locked = true;
                run = 1;
            }
            _ => {
                tracing::debug!(id = record.id, "skipping out-of-order session");
                summary.skipped += 1;
                continue;
            }
        }
        previous = Some(day);
    }

    summary
}
