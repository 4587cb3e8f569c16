//! The quest registry: owns every live instance and fans ticks out to them.

use std::fmt;
use std::sync::Arc;

use questline_core::catalog::QuestCatalog;
use questline_core::clock::Clock;
use questline_core::definition::QuestDefinition;
use questline_core::error::QuestError;
use questline_core::id::{QuestId, QuestInstanceId};
use tracing::{debug, warn};

use crate::domain::aggregates::QuestInstance;
use crate::domain::events::QuestEvent;

/// Collection of active and finished quest instances.
///
/// Finished instances stay in the registry until [`QuestRegistry::remove_finished`]
/// or [`QuestRegistry::clear_all`] drops them, so their final state can still
/// be queried.
pub struct QuestRegistry {
    catalog: Arc<dyn QuestCatalog>,
    clock: Arc<dyn Clock>,
    instances: Vec<QuestInstance>,
    /// Journal events of instances removed before their events were drained.
    retired_events: Vec<QuestEvent>,
}

impl QuestRegistry {
    /// Creates an empty registry resolving quest ids through `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<dyn QuestCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            clock,
            instances: Vec::new(),
            retired_events: Vec::new(),
        }
    }

    /// Starts a new instance of the quest registered under `quest_id`.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::NotFound` if the catalog does not know the id,
    /// or `QuestError::StartDenied` if the definition refuses to start.
    pub fn start_quest(&mut self, quest_id: &QuestId) -> Result<QuestInstanceId, QuestError> {
        let definition = self
            .catalog
            .resolve(quest_id)
            .ok_or_else(|| QuestError::NotFound(quest_id.clone()))?;
        self.start_definition(definition)
    }

    /// Starts a new instance of `definition`.
    ///
    /// Several instances of the same definition may run side by side.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::StartDenied` if the definition refuses to start.
    /// The definition's `on_start_failed` hook has already run in that case
    /// and nothing was added to the registry.
    pub fn start_definition(
        &mut self,
        definition: Arc<dyn QuestDefinition>,
    ) -> Result<QuestInstanceId, QuestError> {
        if let Err(denial) = definition.can_be_started() {
            warn!(quest = %definition.id(), %denial, "quest start denied");
            definition.on_start_failed(&denial);
            return Err(QuestError::StartDenied {
                quest_id: definition.id().clone(),
                denial,
            });
        }

        let mut instance = QuestInstance::from_definition(definition, Arc::clone(&self.clock));
        instance.start();
        let id = instance.id();
        self.instances.push(instance);
        Ok(id)
    }

    /// Force-completes the first in-progress instance of `quest_id`.
    /// Returns `false` if there was none.
    ///
    /// Finished instances are skipped, so repeated calls walk through the
    /// running instances in start order. Use [`QuestRegistry::first_instance_of`]
    /// to reach the earliest instance regardless of state.
    pub fn complete_quest(&mut self, quest_id: &QuestId) -> bool {
        self.first_running_mut(|i| i.quest_id() == quest_id)
            .is_some_and(QuestInstance::force_complete)
    }

    /// Force-completes the first in-progress instance of `definition`,
    /// skipping finished ones like [`QuestRegistry::complete_quest`].
    pub fn complete_definition(&mut self, definition: &Arc<dyn QuestDefinition>) -> bool {
        self.first_running_mut(|i| Arc::ptr_eq(i.definition(), definition))
            .is_some_and(QuestInstance::force_complete)
    }

    /// Force-fails the first in-progress instance of `quest_id`.
    /// Returns `false` if there was none.
    ///
    /// Finished instances are skipped, so repeated calls walk through the
    /// running instances in start order. Use [`QuestRegistry::first_instance_of`]
    /// to reach the earliest instance regardless of state.
    pub fn fail_quest(&mut self, quest_id: &QuestId) -> bool {
        self.first_running_mut(|i| i.quest_id() == quest_id)
            .is_some_and(QuestInstance::force_fail)
    }

    /// Force-fails the first in-progress instance of `definition`,
    /// skipping finished ones like [`QuestRegistry::fail_quest`].
    pub fn fail_definition(&mut self, definition: &Arc<dyn QuestDefinition>) -> bool {
        self.first_running_mut(|i| Arc::ptr_eq(i.definition(), definition))
            .is_some_and(QuestInstance::force_fail)
    }

    fn first_running_mut(
        &mut self,
        matches: impl Fn(&QuestInstance) -> bool,
    ) -> Option<&mut QuestInstance> {
        self.instances
            .iter_mut()
            .find(|i| !i.is_finished() && matches(i))
    }

    /// All instances of `quest_id`, in start order.
    pub fn instances_of<'a>(
        &'a self,
        quest_id: &'a QuestId,
    ) -> impl Iterator<Item = &'a QuestInstance> + 'a {
        self.instances.iter().filter(move |i| i.quest_id() == quest_id)
    }

    /// All instances of `definition`, in start order.
    pub fn instances_of_definition<'a>(
        &'a self,
        definition: &'a Arc<dyn QuestDefinition>,
    ) -> impl Iterator<Item = &'a QuestInstance> + 'a {
        self.instances
            .iter()
            .filter(move |i| Arc::ptr_eq(i.definition(), definition))
    }

    /// The earliest-started instance of `quest_id`, finished or not.
    #[must_use]
    pub fn first_instance_of(&self, quest_id: &QuestId) -> Option<&QuestInstance> {
        self.instances.iter().find(|i| i.quest_id() == quest_id)
    }

    /// The earliest-started instance of `definition`, finished or not.
    #[must_use]
    pub fn first_instance_of_definition(
        &self,
        definition: &Arc<dyn QuestDefinition>,
    ) -> Option<&QuestInstance> {
        self.instances
            .iter()
            .find(|i| Arc::ptr_eq(i.definition(), definition))
    }

    /// Looks up an instance by id.
    #[must_use]
    pub fn instance(&self, id: QuestInstanceId) -> Option<&QuestInstance> {
        self.instances.iter().find(|i| i.id() == id)
    }

    /// Looks up an instance by id for mutation (for example to reveal a
    /// hidden objective).
    pub fn instance_mut(&mut self, id: QuestInstanceId) -> Option<&mut QuestInstance> {
        self.instances.iter_mut().find(|i| i.id() == id)
    }

    /// Every instance, in start order.
    #[must_use]
    pub fn instances(&self) -> &[QuestInstance] {
        &self.instances
    }

    /// Number of instances held, finished ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if no instance is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Drops every instance without firing any hook. Undrained journal
    /// events are discarded as well.
    pub fn clear_all(&mut self) {
        debug!(instances = self.instances.len(), "clearing quest registry");
        self.instances.clear();
        self.retired_events.clear();
    }

    /// Drops completed and failed instances, keeping their undrained journal
    /// events. Returns how many instances were removed.
    pub fn remove_finished(&mut self) -> usize {
        let before = self.instances.len();
        let mut kept = Vec::with_capacity(before);
        for mut instance in self.instances.drain(..) {
            if instance.is_finished() {
                self.retired_events
                    .extend(instance.take_uncommitted_events());
            } else {
                kept.push(instance);
            }
        }
        self.instances = kept;
        before - self.instances.len()
    }

    /// Advances every instance by `delta_time` seconds, in start order.
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn tick(&mut self, delta_time: f32) {
        let delta_time = if delta_time.is_finite() && delta_time >= 0.0 {
            delta_time
        } else {
            warn!(delta_time, "ignoring invalid tick delta");
            0.0
        };
        for instance in &mut self.instances {
            instance.tick(delta_time);
        }
    }

    /// Hands out every pending journal event, oldest instance first.
    pub fn drain_events(&mut self) -> Vec<QuestEvent> {
        let mut events = std::mem::take(&mut self.retired_events);
        for instance in &mut self.instances {
            events.extend(instance.take_uncommitted_events());
        }
        events
    }
}

impl fmt::Debug for QuestRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestRegistry")
            .field("instances", &self.instances)
            .field("retired_events", &self.retired_events.len())
            .finish_non_exhaustive()
    }
}
