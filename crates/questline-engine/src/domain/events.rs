//! Journal events recorded by quest instances.

use questline_core::event::EventMetadata;
use serde::{Deserialize, Serialize};

/// Event type for `QuestEventKind::QuestStarted`.
pub const QUEST_STARTED_EVENT_TYPE: &str = "quest.started";
/// Event type for `QuestEventKind::QuestCompleted`.
pub const QUEST_COMPLETED_EVENT_TYPE: &str = "quest.completed";
/// Event type for `QuestEventKind::QuestFailed`.
pub const QUEST_FAILED_EVENT_TYPE: &str = "quest.failed";
/// Event type for `QuestEventKind::ObjectiveStarted`.
pub const OBJECTIVE_STARTED_EVENT_TYPE: &str = "quest.objective_started";
/// Event type for `QuestEventKind::ObjectiveCompleted`.
pub const OBJECTIVE_COMPLETED_EVENT_TYPE: &str = "quest.objective_completed";
/// Event type for `QuestEventKind::ObjectiveFailed`.
pub const OBJECTIVE_FAILED_EVENT_TYPE: &str = "quest.objective_failed";

/// Event payload variants.
///
/// Objective events refer to top-level objectives by their index in the
/// instance's objective list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestEventKind {
    /// The quest entered `InProgress`.
    QuestStarted,
    /// The quest completed; `forced` is set for administrative overrides.
    QuestCompleted {
        /// Completed through `force_complete` rather than its objectives.
        forced: bool,
    },
    /// The quest failed; `forced` is set for administrative overrides.
    QuestFailed {
        /// Failed through `force_fail` rather than its objectives.
        forced: bool,
    },
    /// A top-level objective was activated.
    ObjectiveStarted {
        /// Position in the objective list.
        index: usize,
        /// Objective label, if one was authored.
        label: Option<String>,
    },
    /// A top-level objective completed.
    ObjectiveCompleted {
        /// Position in the objective list.
        index: usize,
        /// Objective label, if one was authored.
        label: Option<String>,
    },
    /// A top-level objective failed.
    ObjectiveFailed {
        /// Position in the objective list.
        index: usize,
        /// Objective label, if one was authored.
        label: Option<String>,
    },
}

impl QuestEventKind {
    /// Dotted type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::QuestStarted => QUEST_STARTED_EVENT_TYPE,
            Self::QuestCompleted { .. } => QUEST_COMPLETED_EVENT_TYPE,
            Self::QuestFailed { .. } => QUEST_FAILED_EVENT_TYPE,
            Self::ObjectiveStarted { .. } => OBJECTIVE_STARTED_EVENT_TYPE,
            Self::ObjectiveCompleted { .. } => OBJECTIVE_COMPLETED_EVENT_TYPE,
            Self::ObjectiveFailed { .. } => OBJECTIVE_FAILED_EVENT_TYPE,
        }
    }
}

/// Journal event envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: QuestEventKind,
}

impl QuestEvent {
    /// Dotted type name, e.g. `quest.completed`.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    /// Serializes the payload to JSON.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("QuestEventKind serialization is infallible")
    }
}
