//! Session-complete notifications.
//!
//! The timer calls a [`Notifier`] whenever a phase runs out. What the user
//! actually sees or hears is up to the implementation.

use std::io::Write;

use crate::config::NotificationConfig;
use crate::core::Phase;

/// Side-effect port invoked when a phase completes.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// Called with the phase the timer just entered.
    fn session_complete(&self, entered: Phase);
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn session_complete(&self, _entered: Phase) {}
}

/// Notifier that rings the terminal bell.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    sound: bool,
}

impl TerminalNotifier {
    /// Create a terminal notifier.
    #[must_use]
    pub const fn new(sound: bool) -> Self {
        Self { sound }
    }
}

impl Notifier for TerminalNotifier {
    fn session_complete(&self, entered: Phase) {
        tracing::info!(%entered, "session complete, time to switch");

        if self.sound {
            let mut stdout = std::io::stdout();
            if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
                tracing::warn!(error = %e, "failed to ring terminal bell");
            }
        }
    }
}

/// Build the notifier described by the configuration.
#[must_use]
pub fn from_config(config: &NotificationConfig) -> Box<dyn Notifier> {
    if config.enabled {
        Box::new(TerminalNotifier::new(config.sound))
    } else {
        Box::new(SilentNotifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_notifier() {
        SilentNotifier.session_complete(Phase::Break);
    }

    #[test]
    fn test_terminal_notifier_without_sound() {
        TerminalNotifier::new(false).session_complete(Phase::LongBreak);
    }

    #[test]
    fn test_from_config_disabled() {
        let config = NotificationConfig {
            enabled: false,
            sound: true,
        };
        // Just make sure a disabled notifier can be invoked
        from_config(&config).session_complete(Phase::Work);
    }
}
