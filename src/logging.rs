//! Logging setup.
//!
//! Events normally go to stderr so they never mix with command output.
//! While the full-screen timer owns the terminal they go to a log file
//! instead. `POMO_LOG` takes an `EnvFilter` directive (e.g. `pomo=debug`);
//! otherwise the level follows the `-v` count.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "POMO_LOG";

/// Where log events are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to a file, without ANSI colors
    File(PathBuf),
    Discard,
}

/// Default filter directive for a `-v` count.
#[must_use]
pub const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Later calls are ignored.
///
/// A log file that cannot be opened discards events rather than falling
/// back to stderr, which would draw over the timer screen.
pub fn init(verbosity: u8, target: &LogTarget) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let _ = match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => match open_log(path) {
            Ok(file) => builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init(),
            Err(_) => builder.with_writer(io::sink).try_init(),
        },
        LogTarget::Discard => builder.with_writer(io::sink).try_init(),
    };
}

/// Open `path` for appending, creating it and its directory if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn open_log(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
