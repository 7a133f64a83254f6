//! Application state for the timer TUI.

use crate::core::Phase;
use crate::error::PomoError;
use crate::features::sessions::SessionStore;
use crate::features::timer::{PhaseCompletion, TimerRunner, TimerState};

/// Application state.
pub struct App<'a> {
    runner: TimerRunner,
    store: &'a SessionStore,
    user: String,
    /// Status message to display.
    pub status: Option<String>,
    /// Phases saved during this run.
    pub recorded: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<'a> App<'a> {
    /// Create an app around a stopped timer.
    #[must_use]
    pub fn new(runner: TimerRunner, store: &'a SessionStore, user: impl Into<String>) -> Self {
        Self {
            runner,
            store,
            user: user.into(),
            status: Some("Press s to start".to_string()),
            recorded: 0,
            should_quit: false,
        }
    }

    /// Current timer state.
    #[must_use]
    pub const fn state(&self) -> &TimerState {
        self.runner.state()
    }

    /// Fraction of the current phase that has elapsed.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.runner.timer().progress()
    }

    /// Remaining time as `MM:SS`.
    #[must_use]
    pub fn remaining(&self) -> String {
        self.runner.timer().format_remaining()
    }

    /// Work rounds before each long break.
    #[must_use]
    pub const fn rounds_per_cycle(&self) -> u32 {
        self.runner.timer().settings().rounds_before_long_break
    }

    /// Start if paused, pause if running.
    ///
    /// # Errors
    ///
    /// Returns an error if the tick source cannot be started.
    pub fn toggle(&mut self) -> Result<(), PomoError> {
        self.runner.toggle()?;
        self.status = Some(if self.state().running {
            "Running".to_string()
        } else {
            "Paused".to_string()
        });
        Ok(())
    }

    /// Pause the timer.
    pub fn pause(&mut self) {
        self.runner.pause();
        self.status = Some("Paused".to_string());
    }

    /// Reset to a stopped Work phase.
    pub fn reset(&mut self) {
        self.runner.reset();
        self.status = Some("Reset".to_string());
    }

    /// Apply ticks that arrived since the last call and save any finished
    /// phases.
    ///
    /// A failed save is reported in the status line; the timer keeps going.
    pub fn on_tick(&mut self) {
        let completions = self.runner.drain();
        self.record(&completions);
    }

    fn record(&mut self, completions: &[PhaseCompletion]) {
        for completion in completions {
            match self.store.record_completion(&self.user, completion) {
                Ok(record) => {
                    self.recorded += 1;
                    self.status = Some(transition_message(completion));
                    tracing::debug!(id = record.id, "recorded phase");
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to record session");
                    self.status = Some(format!("Could not save session: {e}"));
                }
            }
        }
    }

    /// Stop the tick source.
    pub fn shutdown(&mut self) {
        self.runner.shutdown();
    }

    /// Request exit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn transition_message(completion: &PhaseCompletion) -> String {
    match completion.entered {
        Phase::Work => "Break over, back to work".to_string(),
        Phase::Break => format!("Round {} done, take a short break", completion.rounds_completed),
        Phase::LongBreak => format!(
            "Round {} done, take a long break",
            completion.rounds_completed
        ),
    }
}
