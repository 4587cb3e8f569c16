//! Scripted flag changes that stand in for player input.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::DemoError;

/// One scheduled flag change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduledFlag {
    /// Tick number (1-based) on which the change applies, before the tick runs.
    pub at_tick: u32,
    /// Flag to raise.
    #[serde(default)]
    pub set: Option<String>,
    /// Flag to lower.
    #[serde(default)]
    pub clear: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScriptDocument {
    #[serde(default)]
    schedule: Vec<ScheduledFlag>,
}

/// Flag changes grouped by tick.
#[derive(Debug, Default)]
pub struct DemoScript {
    by_tick: BTreeMap<u32, Vec<ScheduledFlag>>,
}

impl DemoScript {
    /// Reads the optional `schedule` section of a manifest document.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::Config` if the section is malformed or an entry
    /// neither sets nor clears a flag.
    pub fn from_yaml(source: &str) -> Result<Self, DemoError> {
        let document: ScriptDocument = serde_yaml::from_str(source)
            .map_err(|e| DemoError::Config(format!("invalid schedule: {e}")))?;
        let mut by_tick: BTreeMap<u32, Vec<ScheduledFlag>> = BTreeMap::new();
        for entry in document.schedule {
            if entry.set.is_none() && entry.clear.is_none() {
                return Err(DemoError::Config(format!(
                    "schedule entry at tick {} changes no flag",
                    entry.at_tick
                )));
            }
            by_tick.entry(entry.at_tick).or_default().push(entry);
        }
        Ok(Self { by_tick })
    }

    /// Changes due on `tick`, in manifest order.
    #[must_use]
    pub fn due(&self, tick: u32) -> &[ScheduledFlag] {
        self.by_tick.get(&tick).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of scheduled changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_tick.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_tick.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_entries_by_tick_in_order() {
        // Arrange
        let source = r"
quests: []
schedule:
  - { at_tick: 4, set: b }
  - { at_tick: 2, set: a }
  - { at_tick: 4, clear: a }
";

        // Act
        let script = DemoScript::from_yaml(source).unwrap();

        // Assert
        assert_eq!(script.len(), 3);
        assert_eq!(script.due(2)[0].set.as_deref(), Some("a"));
        let at_four: Vec<(Option<&str>, Option<&str>)> = script
            .due(4)
            .iter()
            .map(|e| (e.set.as_deref(), e.clear.as_deref()))
            .collect();
        assert_eq!(at_four, vec![(Some("b"), None), (None, Some("a"))]);
        assert!(script.due(3).is_empty());
    }

    #[test]
    fn test_missing_schedule_is_empty() {
        let script = DemoScript::from_yaml("quests: []\n").unwrap();
        assert!(script.is_empty());
    }

    #[test]
    fn test_rejects_entry_without_flag() {
        let result = DemoScript::from_yaml("schedule:\n  - at_tick: 1\n");
        assert!(matches!(result, Err(DemoError::Config(_))));
    }
}
