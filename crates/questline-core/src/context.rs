//! Read-only quest view handed to lifecycle hooks.

use crate::id::{QuestId, QuestInstanceId};
use crate::state::QuestState;

/// Snapshot of the owning quest instance, borrowed by every objective and
/// definition hook for the duration of one call.
///
/// Hooks never receive the instance or the registry itself, so they cannot
/// mutate the objective tree or the instance list while it is being walked.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestContext {
    instance_id: QuestInstanceId,
    quest_id: QuestId,
    state: QuestState,
    elapsed: f32,
}

impl QuestContext {
    /// Creates a context for the given instance.
    #[must_use]
    pub fn new(
        instance_id: QuestInstanceId,
        quest_id: QuestId,
        state: QuestState,
        elapsed: f32,
    ) -> Self {
        Self {
            instance_id,
            quest_id,
            state,
            elapsed,
        }
    }

    /// The live instance this context describes.
    #[must_use]
    pub fn instance_id(&self) -> QuestInstanceId {
        self.instance_id
    }

    /// Identity of the quest definition the instance was created from.
    #[must_use]
    pub fn quest_id(&self) -> &QuestId {
        &self.quest_id
    }

    /// Quest state at the moment the hook fires.
    #[must_use]
    pub fn state(&self) -> QuestState {
        self.state
    }

    /// Total seconds of tick time the instance has received.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
