//! Configuration settings for pomo.
//!
//! Settings are loaded from `~/.pomo/config.yaml`. Every field has a default,
//! so a missing file or a partial file is fine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::core::Phase;
use crate::error::PomoError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Timer durations and cadence.
    pub timer: TimerSettings,
    /// Session-complete notifications.
    pub notifications: NotificationConfig,
    /// Rollup windows.
    pub stats: StatsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    pub default_output: OutputFormat,
    /// Color output setting.
    pub color: ColorSetting,
    /// User that sessions are recorded for. Falls back to `$USER`.
    pub user: Option<String>,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply this setting to the `colored` crate's global override.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Timer durations, in seconds, and the tick cadence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimerSettings {
    /// Work phase length.
    pub work_seconds: u32,
    /// Short break length.
    pub break_seconds: u32,
    /// Long break length.
    pub long_break_seconds: u32,
    /// Completed work phases per long break.
    pub rounds_before_long_break: u32,
    /// Milliseconds between ticks. One tick is one simulated second.
    pub tick_interval_ms: u64,
}

/// Session-complete notification settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationConfig {
    /// Notify when a phase completes.
    pub enabled: bool,
    /// Ring the terminal bell.
    pub sound: bool,
}

/// Rollup window settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatsConfig {
    /// Trailing window for the daily rollup.
    pub daily_window_days: u32,
    /// Trailing window for the weekly rollup.
    pub weekly_window_days: u32,
    /// Trailing window for the monthly rollup.
    pub monthly_window_months: u32,
}

impl TimerSettings {
    /// Work phase length: 25 minutes.
    pub const WORK_SECONDS: u32 = 25 * 60;
    /// Short break length: 5 minutes.
    pub const BREAK_SECONDS: u32 = 5 * 60;
    /// Long break length: 15 minutes.
    pub const LONG_BREAK_SECONDS: u32 = 15 * 60;
    /// Rounds before a long break.
    pub const ROUNDS_BEFORE_LONG_BREAK: u32 = 4;

    /// Configured length of a phase in seconds.
    #[must_use]
    pub const fn duration_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_seconds,
            Phase::Break => self.break_seconds,
            Phase::LongBreak => self.long_break_seconds,
        }
    }

    /// Wall-clock time between ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check the settings can drive a timer.
    ///
    /// # Errors
    ///
    /// Returns `PomoError::Config` for zero durations or a zero round threshold.
    pub fn validate(&self) -> Result<(), PomoError> {
        for phase in Phase::ALL {
            if self.duration_for(phase) == 0 {
                return Err(PomoError::Config(format!(
                    "{phase} duration must be at least one second"
                )));
            }
        }
        if self.rounds_before_long_break == 0 {
            return Err(PomoError::Config(
                "rounds_before_long_break must be at least 1".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(PomoError::Config(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Pretty,
            color: ColorSetting::Auto,
            user: None,
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_seconds: Self::WORK_SECONDS,
            break_seconds: Self::BREAK_SECONDS,
            long_break_seconds: Self::LONG_BREAK_SECONDS,
            rounds_before_long_break: Self::ROUNDS_BEFORE_LONG_BREAK,
            tick_interval_ms: 1000,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            daily_window_days: 7,
            weekly_window_days: 28,
            monthly_window_months: 12,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, PomoError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, PomoError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            PomoError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            PomoError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;
        config.timer.validate()?;
        Ok(config)
    }

    /// Write configuration as YAML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), PomoError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| PomoError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            PomoError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Resolve the acting user: explicit value, then config, then `$USER`.
    #[must_use]
    pub fn resolve_user(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.general.user.clone())
            .or_else(|| std::env::var("USER").ok())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| "default".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.general.default_output, OutputFormat::Pretty);
        assert_eq!(config.general.color, ColorSetting::Auto);
        assert_eq!(config.timer.work_seconds, 1500);
        assert_eq!(config.timer.break_seconds, 300);
        assert_eq!(config.timer.long_break_seconds, 900);
        assert_eq!(config.timer.rounds_before_long_break, 4);
        assert_eq!(config.stats.weekly_window_days, 28);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn test_duration_for() {
        let timer = TimerSettings::default();
        assert_eq!(timer.duration_for(Phase::Work), 1500);
        assert_eq!(timer.duration_for(Phase::Break), 300);
        assert_eq!(timer.duration_for(Phase::LongBreak), 900);
        assert_eq!(timer.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_validate_rejects_zero() {
        let mut timer = TimerSettings::default();
        timer.break_seconds = 0;
        assert!(timer.validate().is_err());

        let mut timer = TimerSettings::default();
        timer.rounds_before_long_break = 0;
        assert!(timer.validate().is_err());

        assert!(TimerSettings::default().validate().is_ok());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut config = Config::default();
        config.timer.work_seconds = 3000;
        config.general.user = Some("ada".to_string());

        config.save_to_path(&config_path).unwrap();
        let loaded = Config::load_from_path(&config_path).unwrap();

        assert_eq!(loaded.timer.work_seconds, 3000);
        assert_eq!(loaded.general.user.as_deref(), Some("ada"));
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let partial_yaml = r"
timer:
  work_seconds: 2700
notifications:
  sound: false
";
        std::fs::write(&config_path, partial_yaml).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(config.timer.work_seconds, 2700);
        assert_eq!(config.timer.break_seconds, 300);
        assert!(config.notifications.enabled);
        assert!(!config.notifications.sound);
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_invalid_timer_config_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "timer:\n  work_seconds: 0\n").unwrap();

        assert!(Config::load_from_path(&config_path).is_err());
    }

    #[test]
    fn test_resolve_user_prefers_explicit() {
        let mut config = Config::default();
        config.general.user = Some("config-user".to_string());

        assert_eq!(config.resolve_user(Some("cli-user")), "cli-user");
        assert_eq!(config.resolve_user(None), "config-user");
    }
}
