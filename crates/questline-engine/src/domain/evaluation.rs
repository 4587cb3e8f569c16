//! The per-tick objective evaluation engine.
//!
//! Quest instances and objective groups both expose their children through
//! [`ObjectiveContainer`]; [`tick_completion_status`] walks either one the
//! same way and recurses into nested groups.

use questline_core::context::QuestContext;
use questline_core::objective::ObjectiveNode;
use questline_core::state::QuestState;

/// Anything that owns an ordered list of objectives evaluated each tick.
pub trait ObjectiveContainer {
    /// State of the container itself. Evaluation only runs while `InProgress`.
    fn container_state(&self) -> QuestState;

    /// Children in evaluation order.
    fn objectives_mut(&mut self) -> &mut [ObjectiveNode];

    /// Runs once after both evaluation passes.
    fn after_iteration_complete(&mut self, quest: &QuestContext);
}

/// Evaluates one container for one tick.
///
/// Optional objectives are visited before required ones, so a required
/// objective whose predicate depends on an optional objective's outcome sees
/// this tick's result. Each visited `InProgress` objective is ticked, its
/// subtree evaluated (for groups), and then its predicates checked. When
/// both predicates hold the objective fails.
pub fn tick_completion_status<C>(container: &mut C, quest: &QuestContext, delta_time: f32)
where
    C: ObjectiveContainer + ?Sized,
{
    if container.container_state() != QuestState::InProgress {
        return;
    }

    for required_pass in [false, true] {
        for objective in container
            .objectives_mut()
            .iter_mut()
            .filter(|o| o.is_required() == required_pass)
        {
            verify_objective_status(objective, quest, delta_time);
        }
    }

    container.after_iteration_complete(quest);
}

fn verify_objective_status(objective: &mut ObjectiveNode, quest: &QuestContext, delta_time: f32) {
    if objective.state() != QuestState::InProgress {
        return;
    }

    objective.tick(quest, delta_time);

    if objective.is_group() {
        tick_completion_status(objective, quest, delta_time);
    }

    let complete = objective.should_be_complete();
    let failed = objective.should_be_failed();
    if failed {
        objective.fail(quest);
    } else if complete {
        objective.complete(quest);
    }
}

/// A nested group never aggregates; it only moves its own checklist along.
impl ObjectiveContainer for ObjectiveNode {
    fn container_state(&self) -> QuestState {
        self.state()
    }

    fn objectives_mut(&mut self) -> &mut [ObjectiveNode] {
        self.children_mut()
    }

    fn after_iteration_complete(&mut self, quest: &QuestContext) {
        self.advance_children(quest);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use questline_core::group::{ActivationMode, ObjectiveGroup};
    use questline_core::id::{QuestId, QuestInstanceId};
    use questline_core::objective::{Objective, group_of};
    use questline_test_support::{HookLog, ScriptedObjective};

    use super::*;

    /// Bare container used to exercise the engine without a quest instance.
    struct Checklist {
        state: QuestState,
        objectives: Vec<ObjectiveNode>,
        iterations: usize,
    }

    impl Checklist {
        fn new(state: QuestState, objectives: Vec<ObjectiveNode>) -> Self {
            Self {
                state,
                objectives,
                iterations: 0,
            }
        }
    }

    impl ObjectiveContainer for Checklist {
        fn container_state(&self) -> QuestState {
            self.state
        }

        fn objectives_mut(&mut self) -> &mut [ObjectiveNode] {
            &mut self.objectives
        }

        fn after_iteration_complete(&mut self, _quest: &QuestContext) {
            self.iterations += 1;
        }
    }

    fn context() -> QuestContext {
        QuestContext::new(
            QuestInstanceId::new(),
            QuestId::new("evaluation"),
            QuestState::InProgress,
            0.0,
        )
    }

    #[test]
    fn test_inactive_container_is_not_evaluated() {
        // Arrange
        let log = HookLog::new();
        let (objective, switch) = ScriptedObjective::new("a", &log);
        switch.set_complete();
        let mut checklist = Checklist::new(
            QuestState::Completed,
            vec![ObjectiveNode::task(objective).in_progress()],
        );

        // Act
        tick_completion_status(&mut checklist, &context(), 0.1);

        // Assert
        assert_eq!(checklist.iterations, 0);
        assert!(log.entries().is_empty());
        assert_eq!(checklist.objectives[0].state(), QuestState::InProgress);
    }

    #[test]
    fn test_only_in_progress_objectives_are_ticked() {
        // Arrange
        let log = HookLog::new();
        let (active, _) = ScriptedObjective::new("active", &log);
        let (waiting, _) = ScriptedObjective::new("waiting", &log);
        let mut checklist = Checklist::new(
            QuestState::InProgress,
            vec![
                ObjectiveNode::task(active).in_progress(),
                ObjectiveNode::task(waiting),
            ],
        );

        // Act
        tick_completion_status(&mut checklist, &context(), 0.1);

        // Assert
        assert_eq!(log.entries(), vec!["active:tick".to_owned()]);
        assert_eq!(checklist.iterations, 1);
    }

    #[test]
    fn test_optional_objectives_are_visited_before_required_ones() {
        // Arrange
        let log = HookLog::new();
        let (required, _) = ScriptedObjective::new("required", &log);
        let (optional, _) = ScriptedObjective::new("optional", &log);
        let mut checklist = Checklist::new(
            QuestState::InProgress,
            vec![
                ObjectiveNode::task(required).in_progress(),
                ObjectiveNode::task(optional).optional().in_progress(),
            ],
        );

        // Act
        tick_completion_status(&mut checklist, &context(), 0.1);

        // Assert
        assert_eq!(
            log.entries(),
            vec!["optional:tick".to_owned(), "required:tick".to_owned()]
        );
    }

    struct RaisesFlagOnCompletion {
        flag: Arc<AtomicBool>,
    }

    impl Objective for RaisesFlagOnCompletion {
        fn should_be_complete(&self) -> bool {
            true
        }

        fn on_completed(&mut self, _quest: &QuestContext) {
            self.flag.store(true, Ordering::SeqCst);
        }
    }

    struct WaitsForFlag {
        flag: Arc<AtomicBool>,
    }

    impl Objective for WaitsForFlag {
        fn should_be_complete(&self) -> bool {
            self.flag.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_required_objective_observes_optional_outcome_in_same_tick() {
        // Arrange
        let flag = Arc::new(AtomicBool::new(false));
        let mut checklist = Checklist::new(
            QuestState::InProgress,
            vec![
                ObjectiveNode::task(WaitsForFlag {
                    flag: Arc::clone(&flag),
                })
                .in_progress(),
                ObjectiveNode::task(RaisesFlagOnCompletion {
                    flag: Arc::clone(&flag),
                })
                .optional()
                .in_progress(),
            ],
        );

        // Act
        tick_completion_status(&mut checklist, &context(), 0.1);

        // Assert
        assert_eq!(checklist.objectives[1].state(), QuestState::Completed);
        assert_eq!(checklist.objectives[0].state(), QuestState::Completed);
    }

    #[test]
    fn test_failure_takes_precedence_over_completion() {
        // Arrange
        let log = HookLog::new();
        let (objective, switch) = ScriptedObjective::new("both", &log);
        switch.set_complete();
        switch.set_failed();
        let mut checklist = Checklist::new(
            QuestState::InProgress,
            vec![ObjectiveNode::task(objective).in_progress()],
        );

        // Act
        tick_completion_status(&mut checklist, &context(), 0.1);

        // Assert
        assert_eq!(checklist.objectives[0].state(), QuestState::Failed);
        assert_eq!(log.count("both:completed"), 0);
        assert_eq!(log.count("both:failed"), 1);
    }

    #[test]
    fn test_group_completes_in_same_tick_as_its_last_child() {
        // Arrange
        let log = HookLog::new();
        let (first, first_switch) = ScriptedObjective::new("first", &log);
        let (second, second_switch) = ScriptedObjective::new("second", &log);
        let mut group = group_of(
            ActivationMode::Parallel,
            vec![ObjectiveNode::task(first), ObjectiveNode::task(second)],
        );
        let quest = context();
        group.start(&quest);
        let mut checklist = Checklist::new(QuestState::InProgress, vec![group]);

        // Act
        first_switch.set_complete();
        tick_completion_status(&mut checklist, &quest, 0.1);
        let after_first = checklist.objectives[0].state();

        second_switch.set_complete();
        tick_completion_status(&mut checklist, &quest, 0.1);

        // Assert
        assert_eq!(after_first, QuestState::InProgress);
        assert_eq!(checklist.objectives[0].state(), QuestState::Completed);
    }

    #[test]
    fn test_sequential_group_advances_to_next_child_after_evaluation() {
        // Arrange
        let log = HookLog::new();
        let (first, first_switch) = ScriptedObjective::new("first", &log);
        let (second, _) = ScriptedObjective::new("second", &log);
        let group = ObjectiveGroup::new(ActivationMode::Sequential)
            .with_objective(ObjectiveNode::task(first))
            .with_objective(ObjectiveNode::task(second));
        let mut node = ObjectiveNode::group(group);
        let quest = context();
        node.start(&quest);
        let mut checklist = Checklist::new(QuestState::InProgress, vec![node]);

        // Act
        first_switch.set_complete();
        tick_completion_status(&mut checklist, &quest, 0.1);

        // Assert
        let children = checklist.objectives[0].children();
        assert_eq!(children[0].state(), QuestState::Completed);
        assert_eq!(children[1].state(), QuestState::InProgress);
        assert_eq!(checklist.objectives[0].state(), QuestState::InProgress);
        assert_eq!(log.count("second:started"), 1);
    }

    #[test]
    fn test_failed_required_child_fails_group() {
        // Arrange
        let log = HookLog::new();
        let (child, switch) = ScriptedObjective::new("child", &log);
        let mut group = group_of(ActivationMode::Parallel, vec![ObjectiveNode::task(child)]);
        let quest = context();
        group.start(&quest);
        let mut checklist = Checklist::new(QuestState::InProgress, vec![group]);

        // Act
        switch.set_failed();
        tick_completion_status(&mut checklist, &quest, 0.1);

        // Assert
        assert_eq!(checklist.objectives[0].state(), QuestState::Failed);
    }
}
