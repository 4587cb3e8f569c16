//! Quest error types.

use thiserror::Error;

use crate::definition::StartDenial;
use crate::id::QuestId;

/// Top-level error type for quest operations.
#[derive(Debug, Error)]
pub enum QuestError {
    /// The catalog has no definition for the requested identity.
    #[error("quest not found in catalog: {0}")]
    NotFound(QuestId),

    /// The definition refused to start.
    #[error("quest {quest_id} could not be started: {denial}")]
    StartDenied {
        /// The quest that was refused.
        quest_id: QuestId,
        /// Why it was refused.
        denial: StartDenial,
    },

    /// The shared registry could not be reached (for example a poisoned lock).
    #[error("quest registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// A quest manifest could not be parsed or validated.
    #[error("invalid quest manifest: {0}")]
    Manifest(String),
}
