//! pomo - a Pomodoro timer for the terminal
//!
//! A Work / Break / Long Break session timer with a cancellable tick source,
//! a per-user session store on SQLite, and a streak and rollup analyzer over
//! the stored history.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::PomoError;
pub use features::sessions::SessionStore;
pub use features::timer::{SessionTimer, TimerRunner};
