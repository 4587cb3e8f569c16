//! Questline demo — error types.

use questline_core::error::QuestError;
use thiserror::Error;

/// Startup and runtime errors for the demo binary.
#[derive(Debug, Error)]
pub enum DemoError {
    /// An environment variable or the demo schedule is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The manifest file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine rejected a request.
    #[error("quest error: {0}")]
    Quest(#[from] QuestError),
}
