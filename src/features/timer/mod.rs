//! The Pomodoro timer.
//!
//! - [`SessionTimer`]: the Work / Break / LongBreak state machine
//! - [`Ticker`]: an owned, cancellable one-second cadence
//! - [`TimerRunner`]: a timer bound to its ticker
//! - [`Notifier`]: the session-complete side-effect port

pub mod cadence;
pub mod machine;
pub mod notify;
pub mod runner;

pub use crate::config::TimerSettings;
pub use cadence::{Tick, Ticker};
pub use machine::{PhaseCompletion, SessionTimer, TickOutcome, TimerState};
pub use notify::{Notifier, SilentNotifier, TerminalNotifier};
pub use runner::TimerRunner;
