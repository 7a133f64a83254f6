//! Command implementations for pomo.
//!
//! Each command returns the text to print; `main` does the printing.

mod completions;
mod session;
mod stats;
mod timer;

pub use completions::completions;
pub use session::session;
pub use stats::stats;
pub use timer::{timer, timer_settings};
