//! Objective groups and the activation policy shared by every container.

use serde::{Deserialize, Serialize};

use crate::context::QuestContext;
use crate::objective::ObjectiveNode;
use crate::state::QuestState;

/// How a group activates its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    /// One child at a time, in list order.
    #[default]
    Sequential,
    /// Every inactive child at once when the group starts.
    Parallel,
}

/// Ordered list of child objectives evaluated as one composite objective.
///
/// A group is complete when all of its required children are `Completed` and
/// failed when any required child is `Failed`. It never aggregates its own
/// state: that happens through the completion predicates, checked by the
/// engine after the group's children have been evaluated.
#[derive(Debug, Default)]
pub struct ObjectiveGroup {
    mode: ActivationMode,
    objectives: Vec<ObjectiveNode>,
}

impl ObjectiveGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(mode: ActivationMode) -> Self {
        Self {
            mode,
            objectives: Vec::new(),
        }
    }

    /// Creates a group from an ordered list of children.
    #[must_use]
    pub fn with_objectives(mode: ActivationMode, objectives: Vec<ObjectiveNode>) -> Self {
        Self { mode, objectives }
    }

    /// Appends a child objective.
    #[must_use]
    pub fn with_objective(mut self, objective: ObjectiveNode) -> Self {
        self.objectives.push(objective);
        self
    }

    /// Activation mode of this group.
    #[must_use]
    pub fn mode(&self) -> ActivationMode {
        self.mode
    }

    /// Children in evaluation order.
    #[must_use]
    pub fn objectives(&self) -> &[ObjectiveNode] {
        &self.objectives
    }

    /// Mutable children in evaluation order.
    pub fn objectives_mut(&mut self) -> &mut [ObjectiveNode] {
        &mut self.objectives
    }

    /// All required children are `Completed`.
    #[must_use]
    pub fn should_be_complete(&self) -> bool {
        self.objectives
            .iter()
            .filter(|o| o.is_required())
            .all(|o| o.state() == QuestState::Completed)
    }

    /// Any required child is `Failed`.
    #[must_use]
    pub fn should_be_failed(&self) -> bool {
        self.objectives
            .iter()
            .filter(|o| o.is_required())
            .any(|o| o.state() == QuestState::Failed)
    }

    /// Activates children according to the group's mode. Returns how many
    /// were started.
    pub fn advance(&mut self, quest: &QuestContext) -> usize {
        match self.mode {
            ActivationMode::Sequential => {
                usize::from(activate_next(&mut self.objectives, quest).is_some())
            }
            ActivationMode::Parallel => activate_all(&mut self.objectives, quest),
        }
    }
}

/// Serial activation policy.
///
/// If any objective is already `InProgress`, does nothing. Otherwise starts
/// the first `Inactive` objective in list order and returns its index.
pub fn activate_next(objectives: &mut [ObjectiveNode], quest: &QuestContext) -> Option<usize> {
    if objectives
        .iter()
        .any(|o| o.state() == QuestState::InProgress)
    {
        return None;
    }

    let index = objectives
        .iter()
        .position(|o| o.state() == QuestState::Inactive)?;
    objectives[index].start(quest);
    Some(index)
}

/// Starts every `Inactive` objective in list order. Returns how many started.
pub fn activate_all(objectives: &mut [ObjectiveNode], quest: &QuestContext) -> usize {
    objectives
        .iter_mut()
        .filter(|o| o.state() == QuestState::Inactive)
        .map(|o| o.start(quest))
        .filter(|started| *started)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{QuestId, QuestInstanceId};
    use crate::objective::Objective;

    struct Never;

    impl Objective for Never {
        fn should_be_complete(&self) -> bool {
            false
        }
    }

    fn context() -> QuestContext {
        QuestContext::new(
            QuestInstanceId::new(),
            QuestId::new("group-test"),
            QuestState::InProgress,
            0.0,
        )
    }

    fn states(objectives: &[ObjectiveNode]) -> Vec<QuestState> {
        objectives.iter().map(ObjectiveNode::state).collect()
    }

    #[test]
    fn test_activate_next_walks_list_in_order() {
        // Arrange
        let quest = context();
        let mut objectives: Vec<ObjectiveNode> =
            (0..4).map(|_| ObjectiveNode::task(Never)).collect();

        for expected in 0..4 {
            // Act
            let activated = activate_next(&mut objectives, &quest);

            // Assert
            assert_eq!(activated, Some(expected));
            let in_progress = objectives
                .iter()
                .filter(|o| o.state() == QuestState::InProgress)
                .count();
            assert_eq!(in_progress, 1);

            objectives[expected].complete(&quest);
        }
        assert_eq!(activate_next(&mut objectives, &quest), None);
    }

    #[test]
    fn test_activate_next_is_noop_while_one_is_in_progress() {
        let quest = context();
        let mut objectives = vec![
            ObjectiveNode::task(Never).in_progress(),
            ObjectiveNode::task(Never),
        ];

        assert_eq!(activate_next(&mut objectives, &quest), None);
        assert_eq!(
            states(&objectives),
            vec![QuestState::InProgress, QuestState::Inactive]
        );
    }

    #[test]
    fn test_activate_next_skips_hidden_objectives() {
        let quest = context();
        let mut objectives = vec![
            ObjectiveNode::task(Never).hidden(),
            ObjectiveNode::task(Never),
        ];

        assert_eq!(activate_next(&mut objectives, &quest), Some(1));
        assert_eq!(objectives[0].state(), QuestState::Hidden);
    }

    #[test]
    fn test_parallel_group_activates_all_children() {
        let quest = context();
        let mut group = ObjectiveGroup::new(ActivationMode::Parallel)
            .with_objective(ObjectiveNode::task(Never))
            .with_objective(ObjectiveNode::task(Never).hidden())
            .with_objective(ObjectiveNode::task(Never));

        let started = group.advance(&quest);

        assert_eq!(started, 2);
        assert_eq!(
            states(group.objectives()),
            vec![
                QuestState::InProgress,
                QuestState::Hidden,
                QuestState::InProgress
            ]
        );
    }

    #[test]
    fn test_group_predicates_only_consider_required_children() {
        // Arrange
        let quest = context();
        let mut group = ObjectiveGroup::new(ActivationMode::Parallel)
            .with_objective(ObjectiveNode::task(Never))
            .with_objective(ObjectiveNode::task(Never).optional());
        group.advance(&quest);

        // Act
        group.objectives_mut()[1].fail(&quest);

        // Assert
        assert!(!group.should_be_failed());
        assert!(!group.should_be_complete());

        group.objectives_mut()[0].complete(&quest);
        assert!(group.should_be_complete());
    }
}
