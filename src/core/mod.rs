//! Core abstractions for pomo.
//!
//! Shared types and helpers used by the timer, the session store and the
//! statistics analyzer.

mod duration;
mod phase;
pub mod timestamp;

pub use duration::{format_duration, format_duration_mmss, parse_duration};
pub use phase::Phase;
pub use timestamp::parse_timestamp;
