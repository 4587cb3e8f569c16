//! Recording quest — a `QuestDefinition` that logs its hooks and builds its
//! objectives from a closure.

use std::fmt;

use questline_core::context::QuestContext;
use questline_core::definition::{QuestDefinition, StartDenial};
use questline_core::id::QuestId;
use questline_core::objective::ObjectiveNode;

use crate::hooks::HookLog;

type ObjectiveFactory = Box<dyn Fn() -> Vec<ObjectiveNode> + Send + Sync>;

/// Quest definition that records `"<id>:started"`, `"<id>:completed"`,
/// `"<id>:failed"` and `"<id>:start_failed"` into a [`HookLog`].
pub struct RecordingQuest {
    id: QuestId,
    factory: ObjectiveFactory,
    denial: Option<StartDenial>,
    log: HookLog,
}

impl RecordingQuest {
    /// Creates a quest whose instances get the objectives built by `factory`.
    #[must_use]
    pub fn new<F>(id: &str, log: &HookLog, factory: F) -> Self
    where
        F: Fn() -> Vec<ObjectiveNode> + Send + Sync + 'static,
    {
        Self {
            id: QuestId::new(id),
            factory: Box::new(factory),
            denial: None,
            log: log.clone(),
        }
    }

    /// Makes `can_be_started` refuse with `denial`.
    #[must_use]
    pub fn denying(mut self, denial: StartDenial) -> Self {
        self.denial = Some(denial);
        self
    }

    fn record(&self, hook: &str) {
        self.log.record(format!("{}:{hook}", self.id));
    }
}

impl QuestDefinition for RecordingQuest {
    fn id(&self) -> &QuestId {
        &self.id
    }

    fn create_objectives(&self) -> Vec<ObjectiveNode> {
        (self.factory)()
    }

    fn can_be_started(&self) -> Result<(), StartDenial> {
        match &self.denial {
            Some(denial) => Err(denial.clone()),
            None => Ok(()),
        }
    }

    fn on_started(&self, _quest: &QuestContext) {
        self.record("started");
    }

    fn on_start_failed(&self, _reason: &StartDenial) {
        self.record("start_failed");
    }

    fn on_completed(&self, _quest: &QuestContext) {
        self.record("completed");
    }

    fn on_failed(&self, _quest: &QuestContext) {
        self.record("failed");
    }
}

impl fmt::Debug for RecordingQuest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingQuest")
            .field("id", &self.id)
            .field("denial", &self.denial)
            .finish_non_exhaustive()
    }
}
