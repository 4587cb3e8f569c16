//! Lifecycle state shared by quest instances and objectives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a quest instance or an objective.
///
/// The only forward path is `Inactive -> InProgress -> Completed | Failed`.
/// `Hidden` objectives must be revealed before they can be activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestState {
    /// Not visible to the player.
    Hidden,
    /// Visible but not yet active.
    #[default]
    Inactive,
    /// Active and evaluated every tick.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Finished unsuccessfully.
    Failed,
}

impl QuestState {
    /// Returns `true` for `Completed` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns the snake-case name used in logs and serialized events.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Inactive => "inactive",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for QuestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_inactive() {
        assert_eq!(QuestState::default(), QuestState::Inactive);
    }

    #[test]
    fn test_terminal_classification() {
        assert!(QuestState::Completed.is_terminal());
        assert!(QuestState::Failed.is_terminal());
        assert!(!QuestState::InProgress.is_terminal());
        assert!(!QuestState::Hidden.is_terminal());
    }

    #[test]
    fn test_display_matches_serialized_name() {
        assert_eq!(QuestState::InProgress.to_string(), "in_progress");
        assert_eq!(QuestState::Hidden.as_str(), "hidden");
    }
}
