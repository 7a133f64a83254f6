//! Feature implementations for pomo.
//!
//! - Session timer and its tick cadence
//! - Session records and storage
//! - Streaks, rollups and lifetime statistics

pub mod sessions;
pub mod stats;
pub mod timer;
