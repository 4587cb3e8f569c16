//! Scripted objective — an `Objective` whose predicates are flipped by the
//! test through a detached switch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use questline_core::context::QuestContext;
use questline_core::objective::Objective;

use crate::hooks::HookLog;

/// Handle that flips a [`ScriptedObjective`]'s predicates after the
/// objective has been moved into a quest.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveSwitch {
    complete: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
}

impl ObjectiveSwitch {
    /// Makes `should_be_complete` return `true`.
    pub fn set_complete(&self) {
        self.complete.store(true, Ordering::SeqCst);
    }

    /// Makes `should_be_failed` return `true`.
    pub fn set_failed(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }
}

/// Objective that records every hook into a [`HookLog`] as
/// `"<name>:started"`, `"<name>:completed"`, `"<name>:failed"` and
/// `"<name>:tick"`.
#[derive(Debug)]
pub struct ScriptedObjective {
    name: String,
    switch: ObjectiveSwitch,
    log: HookLog,
}

impl ScriptedObjective {
    /// Creates the objective and the switch that controls it.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &HookLog) -> (Self, ObjectiveSwitch) {
        let switch = ObjectiveSwitch::default();
        let objective = Self {
            name: name.into(),
            switch: switch.clone(),
            log: log.clone(),
        };
        (objective, switch)
    }

    fn record(&self, hook: &str) {
        self.log.record(format!("{}:{hook}", self.name));
    }
}

impl Objective for ScriptedObjective {
    fn should_be_complete(&self) -> bool {
        self.switch.complete.load(Ordering::SeqCst)
    }

    fn should_be_failed(&self) -> bool {
        self.switch.failed.load(Ordering::SeqCst)
    }

    fn on_started(&mut self, _quest: &QuestContext) {
        self.record("started");
    }

    fn on_completed(&mut self, _quest: &QuestContext) {
        self.record("completed");
    }

    fn on_failed(&mut self, _quest: &QuestContext) {
        self.record("failed");
    }

    fn on_tick(&mut self, _quest: &QuestContext, _delta_time: f32) {
        self.record("tick");
    }
}
