//! Timer command implementation.

use colored::Colorize;

use crate::cli::args::TimerArgs;
use crate::config::{Config, TimerSettings};
use crate::core::parse_duration;
use crate::error::PomoError;
use crate::features::sessions::SessionStore;
use crate::features::timer::{notify, Notifier, SessionTimer, SilentNotifier, TimerRunner};

/// Run the interactive timer.
///
/// # Errors
///
/// Returns an error for invalid durations, or if the terminal cannot be
/// used.
pub fn timer(
    store: &SessionStore,
    user: &str,
    args: &TimerArgs,
    config: &Config,
) -> Result<String, PomoError> {
    let settings = timer_settings(config.timer, args)?;
    let notifier: Box<dyn Notifier> = if args.quiet {
        Box::new(SilentNotifier)
    } else {
        notify::from_config(&config.notifications)
    };

    tracing::info!(
        user,
        work = settings.work_seconds,
        short_break = settings.break_seconds,
        long_break = settings.long_break_seconds,
        rounds = settings.rounds_before_long_break,
        "starting timer"
    );

    let runner = TimerRunner::new(SessionTimer::new(settings, notifier));
    let recorded = crate::tui::run(runner, store, user)?;

    Ok(match recorded {
        0 => "No sessions recorded".dimmed().to_string(),
        1 => format!("Recorded {} session", "1".green()),
        n => format!("Recorded {} sessions", n.to_string().green()),
    })
}

/// Apply command-line overrides to the configured timer settings.
///
/// # Errors
///
/// Returns `PomoError::InvalidInput` for unparseable durations, or
/// `PomoError::Config` if the result cannot drive a timer.
pub fn timer_settings(base: TimerSettings, args: &TimerArgs) -> Result<TimerSettings, PomoError> {
    let mut settings = base;

    if let Some(work) = &args.work {
        settings.work_seconds = seconds("work", work)?;
    }
    if let Some(short) = &args.short_break {
        settings.break_seconds = seconds("short break", short)?;
    }
    if let Some(long) = &args.long_break {
        settings.long_break_seconds = seconds("long break", long)?;
    }
    if let Some(rounds) = args.rounds {
        settings.rounds_before_long_break = rounds;
    }

    settings.validate()?;
    Ok(settings)
}

fn seconds(what: &str, input: &str) -> Result<u32, PomoError> {
    parse_duration(input)
        .and_then(|d| u32::try_from(d.num_seconds()).ok())
        .ok_or_else(|| PomoError::InvalidInput(format!("Invalid {what} duration '{input}'")))
}
