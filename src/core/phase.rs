//! The three countdown phases of a Pomodoro cycle.

use serde::{Deserialize, Serialize};

use crate::error::PomoError;

/// A countdown phase, also used as the `mode` of a stored session.
///
/// Serialized with the wire names `work`, `break` and `longBreak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Focused work (25 minutes by default)
    #[serde(rename = "work")]
    Work,
    /// Short break (5 minutes by default)
    #[serde(rename = "break")]
    Break,
    /// Long break after a full set of rounds (15 minutes by default)
    #[serde(rename = "longBreak")]
    LongBreak,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Self; 3] = [Self::Work, Self::Break, Self::LongBreak];

    /// Name used in the database and in JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
            Self::LongBreak => "longBreak",
        }
    }

    /// Parse a phase from user input or a stored value.
    ///
    /// Accepts the wire names plus a few short aliases.
    ///
    /// # Errors
    ///
    /// Returns `PomoError::InvalidInput` for anything else.
    pub fn parse(s: &str) -> Result<Self, PomoError> {
        match s.trim().to_lowercase().as_str() {
            "work" | "w" | "pomodoro" | "pomo" => Ok(Self::Work),
            "break" | "b" | "short" | "short-break" => Ok(Self::Break),
            "longbreak" | "long-break" | "long" | "lb" => Ok(Self::LongBreak),
            other => Err(PomoError::InvalidInput(format!(
                "Invalid mode '{other}' (expected work, break or longBreak)"
            ))),
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
            Self::LongBreak => "Long Break",
        }
    }

    /// Check if this is a break phase.
    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self, Self::Break | Self::LongBreak)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Phase {
    type Err = PomoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
