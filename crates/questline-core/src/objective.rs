//! Objectives: leaf behaviour and the nodes that make up an objective tree.

use std::fmt;

use tracing::debug;

use crate::context::QuestContext;
use crate::group::{ActivationMode, ObjectiveGroup};
use crate::state::QuestState;

/// Domain behaviour of a leaf objective.
///
/// Predicates are pure. Hooks are side-effecting and default to no-ops; the
/// evaluation engine decides when each one fires.
pub trait Objective: Send + Sync {
    /// Returns `true` once the objective's goal has been met.
    fn should_be_complete(&self) -> bool;

    /// Returns `true` once the objective can no longer succeed.
    fn should_be_failed(&self) -> bool {
        false
    }

    /// Called when the objective becomes `InProgress`.
    fn on_started(&mut self, _quest: &QuestContext) {}

    /// Called when the objective becomes `Completed`.
    fn on_completed(&mut self, _quest: &QuestContext) {}

    /// Called when the objective becomes `Failed`.
    fn on_failed(&mut self, _quest: &QuestContext) {}

    /// Called once per tick while the objective is `InProgress`, before its
    /// predicates are evaluated.
    fn on_tick(&mut self, _quest: &QuestContext, _delta_time: f32) {}
}

/// What an objective node evaluates: a leaf behaviour or a nested group.
pub enum ObjectiveKind {
    /// A leaf objective with domain predicates.
    Task(Box<dyn Objective>),
    /// A composite objective evaluated as a unit.
    Group(ObjectiveGroup),
}

/// One entry in an objective tree: the objective plus the state the engine
/// tracks for it.
pub struct ObjectiveNode {
    label: Option<String>,
    state: QuestState,
    required: bool,
    kind: ObjectiveKind,
}

impl ObjectiveNode {
    /// Wraps a leaf objective. The node starts `Inactive` and required.
    #[must_use]
    pub fn task(objective: impl Objective + 'static) -> Self {
        Self::from_kind(ObjectiveKind::Task(Box::new(objective)))
    }

    /// Wraps a group of child objectives.
    #[must_use]
    pub fn group(group: ObjectiveGroup) -> Self {
        Self::from_kind(ObjectiveKind::Group(group))
    }

    fn from_kind(kind: ObjectiveKind) -> Self {
        Self {
            label: None,
            state: QuestState::Inactive,
            required: true,
            kind,
        }
    }

    /// Attaches a human-readable label used in logs.
    #[must_use]
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marks the objective as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Authors the objective as `Hidden`; activation skips it until revealed.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.state = QuestState::Hidden;
        self
    }

    /// Authors the objective as already `InProgress`, so it runs alongside
    /// whichever sibling the activation policy picks. No start hook fires.
    #[must_use]
    pub fn in_progress(mut self) -> Self {
        self.state = QuestState::InProgress;
        self
    }

    /// Label attached with [`ObjectiveNode::named`], if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> QuestState {
        self.state
    }

    /// Whether failure or incompletion of this objective blocks its parent.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Changes whether this objective is required.
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Returns `true` if this node is a group.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ObjectiveKind::Group(_))
    }

    /// Child objectives; empty for leaf objectives.
    #[must_use]
    pub fn children(&self) -> &[ObjectiveNode] {
        match &self.kind {
            ObjectiveKind::Group(group) => group.objectives(),
            ObjectiveKind::Task(_) => &[],
        }
    }

    /// Mutable child objectives; empty for leaf objectives.
    pub fn children_mut(&mut self) -> &mut [ObjectiveNode] {
        match &mut self.kind {
            ObjectiveKind::Group(group) => group.objectives_mut(),
            ObjectiveKind::Task(_) => &mut [],
        }
    }

    /// Evaluates the completion predicate.
    #[must_use]
    pub fn should_be_complete(&self) -> bool {
        match &self.kind {
            ObjectiveKind::Task(objective) => objective.should_be_complete(),
            ObjectiveKind::Group(group) => group.should_be_complete(),
        }
    }

    /// Evaluates the failure predicate.
    #[must_use]
    pub fn should_be_failed(&self) -> bool {
        match &self.kind {
            ObjectiveKind::Task(objective) => objective.should_be_failed(),
            ObjectiveKind::Group(group) => group.should_be_failed(),
        }
    }

    /// Moves a `Hidden` objective to `Inactive`. Returns `false` for any
    /// other state.
    pub fn reveal(&mut self) -> bool {
        if self.state != QuestState::Hidden {
            return false;
        }
        self.state = QuestState::Inactive;
        true
    }

    /// Activates an `Inactive` objective and fires its start hook. A group
    /// then activates its own children according to its mode.
    ///
    /// Returns `false` without side effects from any other state.
    pub fn start(&mut self, quest: &QuestContext) -> bool {
        if self.state != QuestState::Inactive {
            return false;
        }
        self.state = QuestState::InProgress;
        debug!(quest = %quest.quest_id(), objective = self.display_name(), "objective started");
        match &mut self.kind {
            ObjectiveKind::Task(objective) => objective.on_started(quest),
            ObjectiveKind::Group(group) => {
                group.advance(quest);
            }
        }
        true
    }

    /// Fires the tick hook of a leaf objective. Groups have no tick hook of
    /// their own; their children are ticked by the evaluation engine.
    pub fn tick(&mut self, quest: &QuestContext, delta_time: f32) {
        if let ObjectiveKind::Task(objective) = &mut self.kind {
            objective.on_tick(quest, delta_time);
        }
    }

    /// Moves an `InProgress` objective to `Completed` and fires its hook.
    pub fn complete(&mut self, quest: &QuestContext) -> bool {
        if self.state != QuestState::InProgress {
            return false;
        }
        self.state = QuestState::Completed;
        debug!(quest = %quest.quest_id(), objective = self.display_name(), "objective completed");
        if let ObjectiveKind::Task(objective) = &mut self.kind {
            objective.on_completed(quest);
        }
        true
    }

    /// Moves an `InProgress` objective to `Failed` and fires its hook.
    pub fn fail(&mut self, quest: &QuestContext) -> bool {
        if self.state != QuestState::InProgress {
            return false;
        }
        self.state = QuestState::Failed;
        debug!(quest = %quest.quest_id(), objective = self.display_name(), "objective failed");
        if let ObjectiveKind::Task(objective) = &mut self.kind {
            objective.on_failed(quest);
        }
        true
    }

    /// Runs the group's post-evaluation activation step. No-op for leaves.
    pub fn advance_children(&mut self, quest: &QuestContext) -> usize {
        match &mut self.kind {
            ObjectiveKind::Group(group) => group.advance(quest),
            ObjectiveKind::Task(_) => 0,
        }
    }

    fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(match self.kind {
            ObjectiveKind::Task(_) => "task",
            ObjectiveKind::Group(_) => "group",
        })
    }
}

impl fmt::Debug for ObjectiveNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ObjectiveNode");
        s.field("label", &self.label)
            .field("state", &self.state)
            .field("required", &self.required);
        match &self.kind {
            ObjectiveKind::Task(_) => s.field("kind", &"task"),
            ObjectiveKind::Group(group) => s
                .field("mode", &group.mode())
                .field("children", &group.objectives()),
        };
        s.finish()
    }
}

impl From<ObjectiveGroup> for ObjectiveNode {
    fn from(group: ObjectiveGroup) -> Self {
        Self::group(group)
    }
}

/// Convenience for building a nested group node in one expression.
#[must_use]
pub fn group_of(mode: ActivationMode, children: Vec<ObjectiveNode>) -> ObjectiveNode {
    ObjectiveNode::group(ObjectiveGroup::with_objectives(mode, children))
}
