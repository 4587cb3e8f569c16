//! Shared test helpers for engine integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use questline_core::clock::Clock;
use questline_core::context::QuestContext;
use questline_core::definition::QuestDefinition;
use questline_core::objective::{Objective, ObjectiveNode};
use questline_engine::application::catalog::InMemoryCatalog;
use questline_engine::application::manifest::{FlagObjective, WorldFlags};
use questline_engine::application::registry::QuestRegistry;
use questline_test_support::{FixedClock, HookLog, RecordingQuest};

/// Fixed timestamp used across all integration tests.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Registry over a catalog holding `definitions`.
pub fn registry_with(definitions: &[Arc<dyn QuestDefinition>]) -> QuestRegistry {
    let mut catalog = InMemoryCatalog::new();
    for definition in definitions {
        catalog.register(Arc::clone(definition));
    }
    QuestRegistry::new(Arc::new(catalog), fixed_clock())
}

/// Leaf objective completing on `flag`, recording its hooks under `flag`.
pub fn flag_task(flag: &str, flags: &WorldFlags, log: &HookLog) -> ObjectiveNode {
    ObjectiveNode::task(Logged {
        name: flag.to_owned(),
        inner: FlagObjective::new(flag, flags.clone()),
        log: log.clone(),
        raises_on_completion: None,
    })
    .named(flag)
}

/// Leaf objective completing on `flag` that raises `raises` from its
/// completion hook.
pub fn raising_task(flag: &str, raises: &str, flags: &WorldFlags, log: &HookLog) -> ObjectiveNode {
    ObjectiveNode::task(Logged {
        name: flag.to_owned(),
        inner: FlagObjective::new(flag, flags.clone()),
        log: log.clone(),
        raises_on_completion: Some((raises.to_owned(), flags.clone())),
    })
    .named(flag)
}

/// Quest definition whose instances get the objectives built by `factory`.
pub fn quest<F>(id: &str, log: &HookLog, factory: F) -> Arc<dyn QuestDefinition>
where
    F: Fn() -> Vec<ObjectiveNode> + Send + Sync + 'static,
{
    Arc::new(RecordingQuest::new(id, log, factory))
}

struct Logged {
    name: String,
    inner: FlagObjective,
    log: HookLog,
    raises_on_completion: Option<(String, WorldFlags)>,
}

impl Objective for Logged {
    fn should_be_complete(&self) -> bool {
        self.inner.should_be_complete()
    }

    fn should_be_failed(&self) -> bool {
        self.inner.should_be_failed()
    }

    fn on_started(&mut self, _quest: &QuestContext) {
        self.log.record(format!("{}:started", self.name));
    }

    fn on_completed(&mut self, _quest: &QuestContext) {
        self.log.record(format!("{}:completed", self.name));
        if let Some((flag, flags)) = &self.raises_on_completion {
            flags.set(flag.clone());
        }
    }

    fn on_failed(&mut self, _quest: &QuestContext) {
        self.log.record(format!("{}:failed", self.name));
    }

    fn on_tick(&mut self, _quest: &QuestContext, _delta_time: f32) {
        self.log.record(format!("{}:tick", self.name));
    }
}
