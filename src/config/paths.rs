//! Path resolution for pomo configuration and data files.
//!
//! All pomo data is stored in `~/.pomo/` (or `$POMO_HOME` when set):
//! - `config.yaml` - Main configuration file
//! - `pomo.db` - SQLite database with session history and the stats cache
//! - `pomo.log` - log output while the full-screen timer owns the terminal

use std::path::PathBuf;

use crate::error::PomoError;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "POMO_HOME";

/// Paths to pomo configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.pomo/`
    pub root: PathBuf,
    /// Config file: `~/.pomo/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.pomo/pomo.db`
    pub database: PathBuf,
    /// Timer log file: `~/.pomo/pomo.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Resolve paths from `$POMO_HOME`, falling back to `~/.pomo`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `$POMO_HOME` nor `$HOME` is set.
    pub fn new() -> Result<Self, PomoError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var_os("HOME")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| PomoError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".pomo")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("pomo.db"),
            log_file: root.join("pomo.log"),
            root,
        }
    }

    /// Ensure the data directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), PomoError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                PomoError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
            tracing::debug!(path = %self.root.display(), "created data directory");
        }
        Ok(())
    }
}
