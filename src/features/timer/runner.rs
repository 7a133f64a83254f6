//! Binds a [`SessionTimer`] to its tick source.
//!
//! The runner owns the timer, at most one [`Ticker`], and the receiving end
//! of the tick channel. Ticks are applied on the thread that owns the runner,
//! so the timer itself needs no locking.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use super::cadence::{Tick, Ticker};
use super::machine::{PhaseCompletion, SessionTimer, TickOutcome, TimerState};
use crate::error::PomoError;

/// A timer together with its cadence source.
pub struct TimerRunner {
    timer: SessionTimer,
    interval: Duration,
    ticker: Option<Ticker>,
    generation: u64,
    tick_tx: Sender<Tick>,
    tick_rx: Receiver<Tick>,
}

impl TimerRunner {
    /// Wrap a timer. The tick interval comes from the timer's settings.
    #[must_use]
    pub fn new(timer: SessionTimer) -> Self {
        let interval = timer.settings().tick_interval();
        Self::with_interval(timer, interval)
    }

    /// Wrap a timer with an explicit tick interval.
    #[must_use]
    pub fn with_interval(timer: SessionTimer, interval: Duration) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel();
        Self {
            timer,
            interval,
            ticker: None,
            generation: 0,
            tick_tx,
            tick_rx,
        }
    }

    /// The wrapped timer.
    #[must_use]
    pub const fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// Current timer state.
    #[must_use]
    pub const fn state(&self) -> &TimerState {
        self.timer.state()
    }

    /// Whether a ticker is currently active.
    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start the timer and its ticker. Never spawns a second ticker.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker thread cannot be spawned; the timer is
    /// left paused in that case.
    pub fn start(&mut self) -> Result<(), PomoError> {
        self.timer.start();
        if self.ticker.is_some() {
            return Ok(());
        }

        self.generation += 1;
        match Ticker::spawn(self.interval, self.generation, self.tick_tx.clone()) {
            Ok(ticker) => {
                self.ticker = Some(ticker);
                Ok(())
            }
            Err(e) => {
                self.timer.pause();
                Err(e)
            }
        }
    }

    /// Pause the timer and stop the ticker.
    pub fn pause(&mut self) {
        self.timer.pause();
        self.stop_ticker();
    }

    /// Reset the timer and stop the ticker.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.stop_ticker();
    }

    /// Pause if running, start otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if starting fails.
    pub fn toggle(&mut self) -> Result<(), PomoError> {
        if self.timer.state().running {
            self.pause();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Stop the ticker without touching the timer state.
    pub fn shutdown(&mut self) {
        self.stop_ticker();
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    /// Ticks from a stopped ticker may still be queued; they must not count.
    fn is_live(&self, tick: Tick) -> bool {
        self.ticker.is_some() && tick.generation == self.generation
    }

    /// Block until the next live tick, apply it, and return what it did.
    ///
    /// Returns `None` if no live tick arrives within `timeout`.
    #[cfg(test)]
    pub fn wait_tick(&mut self, timeout: Duration) -> Option<TickOutcome> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.tick_rx.recv_timeout(remaining) {
                Ok(tick) if self.is_live(tick) => return Some(self.timer.tick()),
                Ok(_) => {}
                Err(_) => return None,
            }
        }
    }

    /// Apply every queued live tick without blocking.
    ///
    /// Returns the phase completions those ticks produced, oldest first.
    pub fn drain(&mut self) -> Vec<PhaseCompletion> {
        let mut completions = Vec::new();
        while let Ok(tick) = self.tick_rx.try_recv() {
            if !self.is_live(tick) {
                tracing::trace!(generation = tick.generation, "discarding stale tick");
                continue;
            }
            if let TickOutcome::PhaseComplete(completion) = self.timer.tick() {
                completions.push(completion);
            }
        }
        completions
    }
}

impl Drop for TimerRunner {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimerSettings;
    use crate::core::Phase;
    use crate::features::timer::notify::SilentNotifier;

    fn runner(work_seconds: u32, interval: Duration) -> TimerRunner {
        let settings = TimerSettings {
            work_seconds,
            break_seconds: 1,
            long_break_seconds: 1,
            rounds_before_long_break: 4,
            tick_interval_ms: 1,
        };
        let timer = SessionTimer::new(settings, Box::new(SilentNotifier));
        TimerRunner::with_interval(timer, interval)
    }

    /// A runner whose real ticker never fires during a test.
    fn manual_runner() -> TimerRunner {
        runner(10, Duration::from_secs(3600))
    }

    #[test]
    fn test_start_spawns_single_ticker() {
        let mut runner = manual_runner();
        runner.start().unwrap();
        assert!(runner.is_ticking());
        assert_eq!(runner.generation, 1);

        runner.start().unwrap();
        assert_eq!(runner.generation, 1);
        assert!(runner.state().running);
    }

    #[test]
    fn test_pause_and_reset_stop_ticker() {
        let mut runner = manual_runner();
        runner.start().unwrap();
        runner.pause();
        assert!(!runner.is_ticking());
        assert!(!runner.state().running);

        runner.start().unwrap();
        runner.reset();
        assert!(!runner.is_ticking());
        assert_eq!(runner.state().remaining_seconds, 10);

        // Stopping twice is fine
        runner.pause();
        runner.reset();
    }

    #[test]
    fn test_toggle() {
        let mut runner = manual_runner();
        runner.toggle().unwrap();
        assert!(runner.state().running);
        runner.toggle().unwrap();
        assert!(!runner.state().running);
        assert!(!runner.is_ticking());
    }

    #[test]
    fn test_stale_ticks_are_discarded() {
        let mut runner = manual_runner();

        // Nothing is running: any tick is stale
        runner.tick_tx.send(Tick { generation: 0 }).unwrap();
        assert!(runner.drain().is_empty());
        assert_eq!(runner.state().remaining_seconds, 10);

        runner.start().unwrap();
        runner.tick_tx.send(Tick { generation: 1 }).unwrap();
        runner.drain();
        assert_eq!(runner.state().remaining_seconds, 9);

        runner.pause();
        runner.tick_tx.send(Tick { generation: 1 }).unwrap();
        runner.drain();
        assert_eq!(runner.state().remaining_seconds, 9);

        // After resuming, only the new generation counts
        runner.start().unwrap();
        runner.tick_tx.send(Tick { generation: 1 }).unwrap();
        runner.tick_tx.send(Tick { generation: 2 }).unwrap();
        runner.drain();
        assert_eq!(runner.state().remaining_seconds, 8);
    }

    #[test]
    fn test_drain_reports_completions() {
        let mut runner = runner(1, Duration::from_secs(3600));
        runner.start().unwrap();
        for _ in 0..2 {
            runner.tick_tx.send(Tick { generation: 1 }).unwrap();
        }

        let completions = runner.drain();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].finished, Phase::Work);
        assert_eq!(completions[0].entered, Phase::Break);
        assert_eq!(runner.state().phase, Phase::Break);
    }

    #[test]
    fn test_real_ticker_drives_phase_change() {
        let mut runner = runner(2, Duration::from_millis(1));
        runner.start().unwrap();

        let mut completion = None;
        for _ in 0..10 {
            if let Some(TickOutcome::PhaseComplete(c)) = runner.wait_tick(Duration::from_secs(2)) {
                completion = Some(c);
                break;
            }
        }

        let completion = completion.unwrap();
        assert_eq!(completion.finished, Phase::Work);
        assert_eq!(runner.state().rounds_completed, 1);
    }

    #[test]
    fn test_wait_tick_times_out_when_paused() {
        let mut runner = runner(100, Duration::from_millis(1));
        runner.start().unwrap();
        runner.wait_tick(Duration::from_secs(2)).unwrap();
        runner.pause();

        let remaining = runner.state().remaining_seconds;
        assert!(runner.wait_tick(Duration::from_millis(30)).is_none());
        assert_eq!(runner.state().remaining_seconds, remaining);
    }

    #[test]
    fn test_drop_stops_ticker() {
        let mut runner = runner(100, Duration::from_millis(1));
        runner.start().unwrap();
        drop(runner);
    }
}
