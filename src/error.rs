//! Error types for pomo.

use thiserror::Error;

/// Errors that can occur anywhere in pomo.
///
/// The timer and the analyzer never produce errors; everything here comes
/// from the surrounding layers (configuration, storage, terminal, input).
#[derive(Debug, Error)]
pub enum PomoError {
    /// Configuration could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// The requested record does not exist or belongs to another user.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The terminal could not be set up or drawn to.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization or deserialization failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Filesystem or OS error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
