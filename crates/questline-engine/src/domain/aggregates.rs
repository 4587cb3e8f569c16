//! The quest instance aggregate.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use questline_core::clock::Clock;
use questline_core::context::QuestContext;
use questline_core::definition::QuestDefinition;
use questline_core::event::EventMetadata;
use questline_core::group::activate_next;
use questline_core::id::{QuestId, QuestInstanceId};
use questline_core::objective::ObjectiveNode;
use questline_core::state::QuestState;
use tracing::info;
use uuid::Uuid;

use super::evaluation::{ObjectiveContainer, tick_completion_status};
use super::events::{QuestEvent, QuestEventKind};

/// Live run of a quest definition.
///
/// The instance owns its objective tree and derives its own state from the
/// required top-level objectives after every tick.
pub struct QuestInstance {
    id: QuestInstanceId,
    definition: Arc<dyn QuestDefinition>,
    state: QuestState,
    objectives: Vec<ObjectiveNode>,
    /// Total tick time received while `InProgress`.
    elapsed: f32,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
    /// Top-level objective states captured at the start of the current tick.
    tick_snapshot: Vec<QuestState>,
    /// Number of journal events already handed out.
    version: i64,
    uncommitted_events: Vec<QuestEvent>,
}

impl QuestInstance {
    /// Creates an `Inactive` instance with a fresh objective list from the
    /// definition's factory.
    #[must_use]
    pub fn from_definition(definition: Arc<dyn QuestDefinition>, clock: Arc<dyn Clock>) -> Self {
        let objectives = definition.create_objectives();
        Self {
            id: QuestInstanceId::new(),
            definition,
            state: QuestState::Inactive,
            objectives,
            elapsed: 0.0,
            started_at: None,
            finished_at: None,
            clock,
            tick_snapshot: Vec::new(),
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Instance identifier.
    #[must_use]
    pub fn id(&self) -> QuestInstanceId {
        self.id
    }

    /// Identity of the definition this instance runs.
    #[must_use]
    pub fn quest_id(&self) -> &QuestId {
        self.definition.id()
    }

    /// The definition this instance runs.
    #[must_use]
    pub fn definition(&self) -> &Arc<dyn QuestDefinition> {
        &self.definition
    }

    /// Current quest state.
    #[must_use]
    pub fn state(&self) -> QuestState {
        self.state
    }

    /// Top-level objectives in evaluation order.
    #[must_use]
    pub fn objectives(&self) -> &[ObjectiveNode] {
        &self.objectives
    }

    /// Total seconds ticked while in progress.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// When the instance started, if it has.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the instance reached a terminal state, if it has.
    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns `true` once the quest is `Completed` or `Failed`.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Snapshot handed to lifecycle hooks.
    #[must_use]
    pub fn context(&self) -> QuestContext {
        QuestContext::new(self.id, self.quest_id().clone(), self.state, self.elapsed)
    }

    /// Moves an `Inactive` quest to `InProgress`, fires the definition's
    /// start hook, and activates the first eligible objective.
    ///
    /// Returns `false` without side effects from any other state.
    pub fn start(&mut self) -> bool {
        if self.state != QuestState::Inactive {
            return false;
        }

        self.state = QuestState::InProgress;
        self.started_at = Some(self.clock.now());
        info!(quest = %self.quest_id(), instance = %self.id, "quest started");
        self.record(QuestEventKind::QuestStarted);
        self.definition.on_started(&self.context());

        self.activate_next_objective();
        true
    }

    /// Advances the quest by one tick. No-op unless `InProgress`.
    pub fn tick(&mut self, delta_time: f32) {
        if self.state != QuestState::InProgress {
            return;
        }

        self.elapsed += delta_time;
        self.tick_snapshot = self.objectives.iter().map(ObjectiveNode::state).collect();
        let quest = self.context();
        tick_completion_status(self, &quest, delta_time);
    }

    /// Completes an `InProgress` quest without evaluating its objectives.
    /// Returns `false` from any other state.
    pub fn force_complete(&mut self) -> bool {
        if self.state != QuestState::InProgress {
            return false;
        }
        self.finish(QuestState::Completed, true);
        true
    }

    /// Fails an `InProgress` quest without evaluating its objectives.
    /// Returns `false` from any other state.
    pub fn force_fail(&mut self) -> bool {
        if self.state != QuestState::InProgress {
            return false;
        }
        self.finish(QuestState::Failed, true);
        true
    }

    /// Moves a `Hidden` top-level objective to `Inactive` so the activation
    /// policy can pick it up on a later tick.
    pub fn reveal_objective(&mut self, index: usize) -> bool {
        self.reveal_objective_at(&[index])
    }

    /// Reveals a `Hidden` objective anywhere in the tree. `path` holds one
    /// index per level, starting with the top-level objective; `&[1, 0]` is
    /// the first child of the second objective.
    ///
    /// Returns `false` if the path does not lead to a `Hidden` objective.
    pub fn reveal_objective_at(&mut self, path: &[usize]) -> bool {
        let Some((first, rest)) = path.split_first() else {
            return false;
        };
        let Some(mut node) = self.objectives.get_mut(*first) else {
            return false;
        };
        for index in rest {
            match node.children_mut().get_mut(*index) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.reveal()
    }

    /// Journal events not yet handed out.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[QuestEvent] {
        &self.uncommitted_events
    }

    /// Hands out and clears the pending journal events.
    pub fn take_uncommitted_events(&mut self) -> Vec<QuestEvent> {
        let events = std::mem::take(&mut self.uncommitted_events);
        self.version += i64::try_from(events.len()).unwrap_or(i64::MAX);
        events
    }

    fn required_objectives(&self) -> impl Iterator<Item = &ObjectiveNode> {
        self.objectives.iter().filter(|o| o.is_required())
    }

    /// Failure overrides completion.
    fn aggregate(&mut self) {
        if self
            .required_objectives()
            .any(|o| o.state() == QuestState::Failed)
        {
            self.finish(QuestState::Failed, false);
        } else if self
            .required_objectives()
            .all(|o| o.state() == QuestState::Completed)
        {
            self.finish(QuestState::Completed, false);
        }
    }

    fn finish(&mut self, outcome: QuestState, forced: bool) {
        self.state = outcome;
        self.finished_at = Some(self.clock.now());
        let quest = self.context();
        if outcome == QuestState::Completed {
            info!(quest = %self.quest_id(), instance = %self.id, forced, "quest completed");
            self.record(QuestEventKind::QuestCompleted { forced });
            self.definition.on_completed(&quest);
        } else {
            info!(quest = %self.quest_id(), instance = %self.id, forced, "quest failed");
            self.record(QuestEventKind::QuestFailed { forced });
            self.definition.on_failed(&quest);
        }
    }

    fn activate_next_objective(&mut self) {
        let quest = self.context();
        if let Some(index) = activate_next(&mut self.objectives, &quest) {
            let label = self.objectives[index].label().map(str::to_owned);
            self.record(QuestEventKind::ObjectiveStarted { index, label });
        }
    }

    /// Journals top-level objectives that finished during this tick.
    fn record_objective_outcomes(&mut self) {
        let finished: Vec<(usize, QuestState, Option<String>)> = self
            .objectives
            .iter()
            .zip(&self.tick_snapshot)
            .enumerate()
            .filter(|(_, (objective, before))| {
                **before == QuestState::InProgress && objective.state().is_terminal()
            })
            .map(|(index, (objective, _))| {
                (index, objective.state(), objective.label().map(str::to_owned))
            })
            .collect();

        for (index, state, label) in finished {
            let kind = if state == QuestState::Completed {
                QuestEventKind::ObjectiveCompleted { index, label }
            } else {
                QuestEventKind::ObjectiveFailed { index, label }
            };
            self.record(kind);
        }
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: QuestEventKind) {
        let event = QuestEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                instance_id: self.id,
                quest_id: self.quest_id().clone(),
                sequence_number: self.next_sequence_number(),
                occurred_at: self.clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}

impl ObjectiveContainer for QuestInstance {
    fn container_state(&self) -> QuestState {
        self.state
    }

    fn objectives_mut(&mut self) -> &mut [ObjectiveNode] {
        &mut self.objectives
    }

    fn after_iteration_complete(&mut self, _quest: &QuestContext) {
        self.record_objective_outcomes();
        self.aggregate();
        if self.state == QuestState::InProgress {
            self.activate_next_objective();
        }
    }
}

impl fmt::Debug for QuestInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestInstance")
            .field("id", &self.id)
            .field("quest_id", self.quest_id())
            .field("state", &self.state)
            .field("objectives", &self.objectives)
            .field("elapsed", &self.elapsed)
            .field("started_at", &self.started_at)
            .field("finished_at", &self.finished_at)
            .finish_non_exhaustive()
    }
}
