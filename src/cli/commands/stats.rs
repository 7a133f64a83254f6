//! Stats command implementation.

use chrono::Local;

use crate::cli::args::{OutputFormat, StatsCommands};
use crate::config::StatsConfig;
use crate::error::PomoError;
use crate::features::sessions::{HistoryFilter, SessionStore, StatsCache};
use crate::features::stats::{compute_rollup, compute_streaks, Granularity};
use crate::output::{format_overall, format_rollup, format_streak};

/// Execute stats subcommands.
///
/// # Errors
///
/// Returns an error if history cannot be loaded or output formatting fails.
pub fn stats(
    store: &SessionStore,
    user: &str,
    cmd: StatsCommands,
    config: &StatsConfig,
    format: OutputFormat,
) -> Result<String, PomoError> {
    match cmd {
        StatsCommands::Overall => {
            let overall = StatsCache::new(store).overall(user)?;
            format_overall(&overall, format)
        }
        StatsCommands::Streak => {
            let history = store.history(user, &HistoryFilter::completed_work())?;
            let mut streak = compute_streaks(&history.records);
            streak.skipped += history.invalid;
            format_streak(&streak, format)
        }
        StatsCommands::Daily => rollup(store, user, Granularity::Daily, config, format),
        StatsCommands::Weekly => rollup(store, user, Granularity::Weekly, config, format),
        StatsCommands::Monthly => rollup(store, user, Granularity::Monthly, config, format),
    }
}

fn rollup(
    store: &SessionStore,
    user: &str,
    granularity: Granularity,
    config: &StatsConfig,
    format: OutputFormat,
) -> Result<String, PomoError> {
    let window_start = granularity.window_start_with(&Local::now(), config);
    let history = store.history(user, &HistoryFilter::completed_since(window_start))?;

    let mut rollup = compute_rollup(&history.records, granularity, window_start);
    rollup.skipped += history.invalid;
    tracing::debug!(
        user,
        %granularity,
        periods = rollup.periods.len(),
        skipped = rollup.skipped,
        "computed rollup"
    );

    format_rollup(&rollup, format)
}
