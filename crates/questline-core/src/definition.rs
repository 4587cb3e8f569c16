//! Quest definitions: immutable templates that produce objective trees.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::QuestContext;
use crate::id::QuestId;
use crate::objective::ObjectiveNode;

/// Machine-readable reason a quest refused to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialCode {
    /// A prerequisite (another quest, a world flag, a level) is not met.
    PrerequisiteUnmet,
    /// The quest may only run once at a time and is already running.
    AlreadyActive,
    /// The quest is currently not offered.
    Unavailable,
    /// Application-defined reason.
    Custom(u16),
}

impl fmt::Display for DenialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrerequisiteUnmet => f.write_str("prerequisite_unmet"),
            Self::AlreadyActive => f.write_str("already_active"),
            Self::Unavailable => f.write_str("unavailable"),
            Self::Custom(code) => write!(f, "custom({code:#06x})"),
        }
    }
}

/// Structured result of a refused start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartDenial {
    /// Reason code.
    pub code: DenialCode,
    /// Human-readable explanation.
    pub message: String,
}

impl StartDenial {
    /// Creates a denial with the given code and message.
    #[must_use]
    pub fn new(code: DenialCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for StartDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Template for a quest type.
///
/// Definitions are shared by every instance created from them and are never
/// mutated by the engine. Hooks take `&self`; definitions that need to record
/// something use interior mutability.
pub trait QuestDefinition: Send + Sync {
    /// Stable identity used by catalogs and registry queries.
    fn id(&self) -> &QuestId;

    /// Display name; defaults to the identity.
    fn name(&self) -> &str {
        self.id().as_str()
    }

    /// Produces a fresh objective list for a new instance.
    fn create_objectives(&self) -> Vec<ObjectiveNode>;

    /// Decides whether a new instance may start.
    ///
    /// # Errors
    ///
    /// Returns the `StartDenial` describing why the quest cannot start.
    fn can_be_started(&self) -> Result<(), StartDenial> {
        Ok(())
    }

    /// Called after an instance enters `InProgress`.
    fn on_started(&self, _quest: &QuestContext) {}

    /// Called when `can_be_started` refuses a start.
    fn on_start_failed(&self, _reason: &StartDenial) {}

    /// Called when an instance becomes `Completed`.
    fn on_completed(&self, _quest: &QuestContext) {}

    /// Called when an instance becomes `Failed`.
    fn on_failed(&self, _quest: &QuestContext) {}
}
