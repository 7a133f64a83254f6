//! Session statistics.
//!
//! Pure functions over session history:
//! - Daily streaks of completed work
//! - Daily, weekly and monthly rollups
//! - A lifetime aggregate per user
//!
//! Nothing here touches the database or the timer; callers load history
//! from the session store and pass it in.

pub mod overview;
pub mod rollup;
pub mod streak;
pub mod visualization;

pub use overview::OverallStats;
pub use rollup::{compute_rollup, compute_rollup_in, Granularity, PeriodTotals, Rollup};
pub use streak::{compute_streaks, compute_streaks_in, StreakSummary};
pub use visualization::{render_bar_chart, render_rollup_chart, render_sparkline};
