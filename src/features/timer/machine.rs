//! The Pomodoro session timer.
//!
//! A finite-state countdown over Work, Break and LongBreak phases. The timer
//! never looks at a clock to count: it advances exactly one simulated second
//! per [`SessionTimer::tick`], and the caller decides when ticks happen
//! (see [`super::TimerRunner`]).

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::notify::Notifier;
use crate::config::TimerSettings;
use crate::core::{format_duration_mmss, Phase};

/// Live state of a timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Current phase
    pub phase: Phase,
    /// Whether ticks advance the countdown
    pub running: bool,
    /// Work phases completed since the last reset
    pub rounds_completed: u32,
    /// Display time of the first start in the current work cycle
    pub session_start_label: Option<String>,
}

impl TimerState {
    fn initial(settings: &TimerSettings) -> Self {
        Self {
            remaining_seconds: settings.duration_for(Phase::Work),
            phase: Phase::Work,
            running: false,
            rounds_completed: 0,
            session_start_label: None,
        }
    }
}

/// A finished phase, ready to be stored as a session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseCompletion {
    /// The phase that just ran out
    pub finished: Phase,
    /// The phase the timer moved into
    pub entered: Phase,
    /// When the finished phase was first started
    pub started_at: DateTime<Utc>,
    /// Configured length of the finished phase
    pub duration_seconds: u32,
    /// Rounds completed after the transition
    pub rounds_completed: u32,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is not running; nothing changed.
    Idle,
    /// One second was counted down.
    Counted,
    /// The phase was at zero and the timer moved to the next one.
    PhaseComplete(PhaseCompletion),
}

/// The session timer state machine.
pub struct SessionTimer {
    settings: TimerSettings,
    state: TimerState,
    phase_started_at: Option<DateTime<Utc>>,
    notifier: Box<dyn Notifier>,
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("phase_started_at", &self.phase_started_at)
            .finish_non_exhaustive()
    }
}

impl SessionTimer {
    /// Create a stopped timer at the start of a Work phase.
    #[must_use]
    pub fn new(settings: TimerSettings, notifier: Box<dyn Notifier>) -> Self {
        Self {
            state: TimerState::initial(&settings),
            settings,
            phase_started_at: None,
            notifier,
        }
    }

    /// Start or resume the countdown. No-op while already running.
    pub fn start(&mut self) {
        if self.state.running {
            return;
        }

        self.state.running = true;
        if self.state.session_start_label.is_none() {
            self.state.session_start_label = Some(start_label(Local::now()));
        }
        if self.phase_started_at.is_none() {
            self.phase_started_at = Some(Utc::now());
        }

        tracing::debug!(
            phase = %self.state.phase,
            remaining = self.state.remaining_seconds,
            "timer started"
        );
    }

    /// Pause the countdown. Idempotent.
    pub fn pause(&mut self) {
        if self.state.running {
            tracing::debug!(remaining = self.state.remaining_seconds, "timer paused");
        }
        self.state.running = false;
    }

    /// Return to a stopped Work phase with zero rounds.
    pub fn reset(&mut self) {
        self.state = TimerState::initial(&self.settings);
        self.phase_started_at = None;
        tracing::debug!("timer reset");
    }

    /// Advance one simulated second.
    ///
    /// At zero remaining seconds this fires the session-complete
    /// notification and moves to the next phase instead of counting.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }

        if self.state.remaining_seconds > 0 {
            self.state.remaining_seconds -= 1;
            return TickOutcome::Counted;
        }

        TickOutcome::PhaseComplete(self.complete_phase())
    }

    fn complete_phase(&mut self) -> PhaseCompletion {
        let finished = self.state.phase;
        let rounds = match finished {
            Phase::Work => self.state.rounds_completed.saturating_add(1),
            Phase::Break | Phase::LongBreak => self.state.rounds_completed,
        };
        let entered = match finished {
            Phase::Work if rounds % self.settings.rounds_before_long_break.max(1) == 0 => {
                Phase::LongBreak
            }
            Phase::Work => Phase::Break,
            Phase::Break | Phase::LongBreak => Phase::Work,
        };

        self.notifier.session_complete(entered);

        let now = Utc::now();
        let duration_seconds = self.settings.duration_for(finished);
        let started_at = self.phase_started_at.unwrap_or_else(|| {
            now - chrono::Duration::seconds(i64::from(duration_seconds))
        });

        self.state.rounds_completed = rounds;
        if entered == Phase::Work {
            self.state.session_start_label = None;
        }
        self.state.phase = entered;
        self.state.remaining_seconds = self.settings.duration_for(entered);
        self.phase_started_at = Some(now);

        tracing::info!(
            %finished,
            %entered,
            rounds = self.state.rounds_completed,
            "phase complete"
        );

        PhaseCompletion {
            finished,
            entered,
            started_at,
            duration_seconds,
            rounds_completed: self.state.rounds_completed,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &TimerState {
        &self.state
    }

    /// Settings the timer was built with.
    #[must_use]
    pub const fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Fraction of the current phase that has elapsed (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        let total = self.settings.duration_for(self.state.phase);
        if total == 0 {
            return 1.0;
        }
        1.0 - f64::from(self.state.remaining_seconds) / f64::from(total)
    }

    /// Remaining time as `MM:SS`.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format_duration_mmss(u64::from(self.state.remaining_seconds))
    }
}

/// Display label for a start time, e.g. `9:05 AM`.
fn start_label(now: DateTime<Local>) -> String {
    now.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::timer::notify::{MockNotifier, SilentNotifier};
    use chrono::TimeZone;
    use mockall::predicate::eq;

    fn timer(settings: TimerSettings) -> SessionTimer {
        SessionTimer::new(settings, Box::new(SilentNotifier))
    }

    fn small_settings() -> TimerSettings {
        TimerSettings {
            work_seconds: 3,
            break_seconds: 1,
            long_break_seconds: 2,
            rounds_before_long_break: 4,
            tick_interval_ms: 1,
        }
    }

    /// Tick `n` times and collect every completion.
    fn run_ticks(timer: &mut SessionTimer, n: u32) -> Vec<PhaseCompletion> {
        (0..n)
            .filter_map(|_| match timer.tick() {
                TickOutcome::PhaseComplete(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Tick until the current phase completes.
    fn finish_phase(timer: &mut SessionTimer) -> PhaseCompletion {
        let ticks = timer.state().remaining_seconds + 1;
        let mut completions = run_ticks(timer, ticks);
        assert_eq!(completions.len(), 1);
        completions.remove(0)
    }

    #[test]
    fn test_initial_state() {
        let timer = timer(TimerSettings::default());
        let state = timer.state();

        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.remaining_seconds, 1500);
        assert!(!state.running);
        assert_eq!(state.rounds_completed, 0);
        assert!(state.session_start_label.is_none());
        assert_eq!(timer.format_remaining(), "25:00");
    }

    #[test]
    fn test_tick_while_stopped_is_idle() {
        let mut timer = timer(TimerSettings::default());
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.state().remaining_seconds, 1500);
    }

    #[test]
    fn test_start_sets_label_once() {
        let mut timer = timer(TimerSettings::default());
        timer.start();
        assert!(timer.state().running);
        let label = timer.state().session_start_label.clone();
        assert!(label.is_some());

        timer.pause();
        timer.start();
        assert_eq!(timer.state().session_start_label, label);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut timer = timer(TimerSettings::default());
        timer.pause();
        timer.pause();
        assert!(!timer.state().running);

        timer.start();
        timer.pause();
        timer.pause();
        assert!(!timer.state().running);
    }

    #[test]
    fn test_each_default_phase_transitions_exactly_once() {
        let settings = TimerSettings::default();
        for (phase, duration) in [(Phase::Work, 1500), (Phase::Break, 300), (Phase::LongBreak, 900)] {
            let mut timer = timer(settings);
            timer.state.phase = phase;
            timer.state.remaining_seconds = duration;
            timer.start();

            // Counting down to zero never transitions
            assert!(run_ticks(&mut timer, duration).is_empty());
            assert_eq!(timer.state().remaining_seconds, 0);
            assert_eq!(timer.state().phase, phase);

            // The tick that observes zero transitions, and only that one
            let completions = run_ticks(&mut timer, 1);
            assert_eq!(completions.len(), 1);
            assert_eq!(completions[0].finished, phase);
            assert_eq!(completions[0].duration_seconds, duration);
            assert_ne!(timer.state().phase, phase);
        }
    }

    #[test]
    fn test_transition_tick_does_not_decrement() {
        let mut timer = timer(small_settings());
        timer.start();
        let completion = finish_phase(&mut timer);

        assert_eq!(completion.entered, Phase::Break);
        assert_eq!(timer.state().remaining_seconds, 1);
        assert_eq!(timer.state().rounds_completed, 1);
        assert!(timer.state().running);
    }

    #[test]
    fn test_fourth_round_goes_to_long_break() {
        let mut timer = timer(small_settings());
        timer.start();

        let mut entered_after_work = Vec::new();
        while entered_after_work.len() < 4 {
            let completion = finish_phase(&mut timer);
            if completion.finished == Phase::Work {
                entered_after_work.push(completion.entered);
            }
        }

        assert_eq!(
            entered_after_work,
            vec![Phase::Break, Phase::Break, Phase::Break, Phase::LongBreak]
        );
        assert_eq!(timer.state().rounds_completed, 4);
        assert_eq!(timer.state().remaining_seconds, 2);

        // Long break leads back to work and the count keeps growing
        let completion = finish_phase(&mut timer);
        assert_eq!(completion.entered, Phase::Work);
        let completion = finish_phase(&mut timer);
        assert_eq!(completion.entered, Phase::Break);
        assert_eq!(completion.rounds_completed, 5);
    }

    #[test]
    fn test_custom_round_threshold() {
        let mut settings = small_settings();
        settings.rounds_before_long_break = 2;
        let mut timer = timer(settings);
        timer.start();

        assert_eq!(finish_phase(&mut timer).entered, Phase::Break);
        assert_eq!(finish_phase(&mut timer).entered, Phase::Work);
        assert_eq!(finish_phase(&mut timer).entered, Phase::LongBreak);
    }

    #[test]
    fn test_break_to_work_clears_label() {
        let mut timer = timer(small_settings());
        timer.start();
        assert!(timer.state().session_start_label.is_some());

        finish_phase(&mut timer);
        // Label survives into the break
        assert!(timer.state().session_start_label.is_some());

        finish_phase(&mut timer);
        assert_eq!(timer.state().phase, Phase::Work);
        assert!(timer.state().session_start_label.is_none());

        // Still running, so start() is a no-op and the label stays unset
        timer.start();
        assert!(timer.state().session_start_label.is_none());

        timer.pause();
        timer.start();
        assert!(timer.state().session_start_label.is_some());
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut timer = timer(small_settings());
        timer.start();
        for _ in 0..3 {
            finish_phase(&mut timer);
        }
        run_ticks(&mut timer, 1);

        timer.reset();
        let expected = TimerState {
            remaining_seconds: 3,
            phase: Phase::Work,
            running: false,
            rounds_completed: 0,
            session_start_label: None,
        };
        assert_eq!(timer.state(), &expected);

        timer.reset();
        assert_eq!(timer.state(), &expected);
    }

    #[test]
    fn test_pause_resume_keeps_count() {
        let mut timer = timer(TimerSettings::default());
        timer.start();
        run_ticks(&mut timer, 100);

        timer.pause();
        for _ in 0..50 {
            assert_eq!(timer.tick(), TickOutcome::Idle);
        }
        assert_eq!(timer.state().remaining_seconds, 1400);

        timer.start();
        run_ticks(&mut timer, 100);
        assert_eq!(timer.state().remaining_seconds, 1300);
    }

    #[test]
    fn test_notifier_receives_entered_phase() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_session_complete()
            .with(eq(Phase::Break))
            .times(1)
            .return_const(());

        let mut timer = SessionTimer::new(small_settings(), Box::new(notifier));
        timer.start();
        run_ticks(&mut timer, 4);
        assert_eq!(timer.state().phase, Phase::Break);
    }

    #[test]
    fn test_notifier_silent_while_counting() {
        let mut notifier = MockNotifier::new();
        notifier.expect_session_complete().times(0);

        let mut timer = SessionTimer::new(small_settings(), Box::new(notifier));
        timer.start();
        run_ticks(&mut timer, 3);
    }

    #[test]
    fn test_completion_started_at_precedes_transition() {
        let mut timer = timer(small_settings());
        let before = Utc::now();
        timer.start();
        let completion = finish_phase(&mut timer);

        assert!(completion.started_at >= before);
        assert!(completion.started_at <= Utc::now());
        assert_eq!(completion.duration_seconds, 3);
    }

    #[test]
    fn test_progress() {
        let mut timer = timer(TimerSettings::default());
        assert!(timer.progress().abs() < f64::EPSILON);

        timer.start();
        run_ticks(&mut timer, 750);
        assert!((timer.progress() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_start_label_format() {
        let morning = Local.with_ymd_and_hms(2024, 3, 10, 9, 5, 0).unwrap();
        assert_eq!(start_label(morning), "9:05 AM");

        let evening = Local.with_ymd_and_hms(2024, 3, 10, 21, 30, 0).unwrap();
        assert_eq!(start_label(evening), "9:30 PM");
    }
}
