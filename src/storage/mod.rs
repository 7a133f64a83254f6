//! Storage layer for pomo.
//!
//! SQLite-based persistence for session history and the per-user stats
//! cache.

mod database;
mod migrations;

pub use database::Database;
