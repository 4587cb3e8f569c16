//! Data-driven quests loaded from a YAML manifest.
//!
//! ```yaml
//! quests:
//!   - id: gate_keys
//!     name: Open the Gate
//!     requires: [met_gatekeeper]
//!     objectives:
//!       - kind: flag
//!         flag: key_a
//!       - kind: group
//!         mode: parallel
//!         objectives:
//!           - kind: flag
//!             flag: key_b
//!           - kind: timer
//!             seconds: 2.5
//!             optional: true
//! ```

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use questline_core::context::QuestContext;
use questline_core::definition::{DenialCode, QuestDefinition, StartDenial};
use questline_core::error::QuestError;
use questline_core::group::{ActivationMode, ObjectiveGroup};
use questline_core::id::QuestId;
use questline_core::objective::{Objective, ObjectiveNode};
use serde::Deserialize;
use tracing::info;

use super::catalog::InMemoryCatalog;

/// Shared set of world flags read by manifest objectives.
#[derive(Debug, Clone, Default)]
pub struct WorldFlags {
    flags: Arc<RwLock<HashSet<String>>>,
}

impl WorldFlags {
    /// Creates an empty flag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises a flag. Returns `false` if it was already set.
    pub fn set(&self, flag: impl Into<String>) -> bool {
        self.flags
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(flag.into())
    }

    /// Lowers a flag. Returns `false` if it was not set.
    pub fn clear(&self, flag: &str) -> bool {
        self.flags
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(flag)
    }

    /// Returns `true` if the flag is raised.
    #[must_use]
    pub fn is_set(&self, flag: &str) -> bool {
        self.flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(flag)
    }
}

/// Completes once a world flag is raised; fails if `fail_flag` is raised.
#[derive(Debug, Clone)]
pub struct FlagObjective {
    flag: String,
    fail_flag: Option<String>,
    flags: WorldFlags,
}

impl FlagObjective {
    /// Creates an objective watching `flag`.
    #[must_use]
    pub fn new(flag: impl Into<String>, flags: WorldFlags) -> Self {
        Self {
            flag: flag.into(),
            fail_flag: None,
            flags,
        }
    }

    /// Fails the objective when `flag` is raised.
    #[must_use]
    pub fn failing_on(mut self, flag: impl Into<String>) -> Self {
        self.fail_flag = Some(flag.into());
        self
    }
}

impl Objective for FlagObjective {
    fn should_be_complete(&self) -> bool {
        self.flags.is_set(&self.flag)
    }

    fn should_be_failed(&self) -> bool {
        self.fail_flag
            .as_deref()
            .is_some_and(|flag| self.flags.is_set(flag))
    }
}

/// Completes after it has been in progress for a number of seconds.
#[derive(Debug, Clone)]
pub struct TimerObjective {
    duration: f32,
    elapsed: f32,
}

impl TimerObjective {
    /// Creates a timer of `seconds`.
    #[must_use]
    pub fn new(seconds: f32) -> Self {
        Self {
            duration: seconds,
            elapsed: 0.0,
        }
    }
}

impl Objective for TimerObjective {
    fn should_be_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn on_tick(&mut self, _quest: &QuestContext, delta_time: f32) {
        self.elapsed += delta_time;
    }
}

/// Root of a manifest document. Unknown top-level keys are ignored so hosts
/// can keep their own sections in the same file.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestManifest {
    /// Quest entries.
    pub quests: Vec<QuestSpec>,
}

/// One quest entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestSpec {
    /// Stable identity.
    pub id: String,
    /// Display name; defaults to the id.
    #[serde(default)]
    pub name: Option<String>,
    /// Flags that must be raised before the quest can start.
    #[serde(default)]
    pub requires: Vec<String>,
    /// Top-level objectives.
    pub objectives: Vec<ObjectiveSpec>,
}

/// One objective entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveSpec {
    /// Label used in logs and journal events.
    #[serde(default)]
    pub label: Option<String>,
    /// Optional objectives never block their parent.
    #[serde(default)]
    pub optional: bool,
    /// Hidden objectives wait until revealed.
    #[serde(default)]
    pub hidden: bool,
    /// Objective behaviour.
    #[serde(flatten)]
    pub kind: ObjectiveSpecKind,
}

/// Objective behaviours available to manifests.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectiveSpecKind {
    /// See [`FlagObjective`].
    Flag {
        /// Flag that completes the objective.
        flag: String,
        /// Flag that fails the objective.
        #[serde(default)]
        fail_flag: Option<String>,
    },
    /// See [`TimerObjective`].
    Timer {
        /// Seconds in progress before completion.
        seconds: f32,
    },
    /// Nested objective group.
    Group {
        /// How children are activated.
        #[serde(default)]
        mode: ActivationMode,
        /// Children in evaluation order.
        objectives: Vec<ObjectiveSpec>,
    },
}

impl QuestManifest {
    /// Parses and validates a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::Manifest` if the document is not valid YAML for
    /// this schema, or if validation fails (duplicate or empty ids, quests or
    /// groups without objectives, negative or non-finite timers).
    pub fn from_yaml(source: &str) -> Result<Self, QuestError> {
        let manifest: Self = serde_yaml::from_str(source)
            .map_err(|e| QuestError::Manifest(format!("failed to parse manifest: {e}")))?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), QuestError> {
        let mut seen = HashSet::new();
        for quest in &self.quests {
            if quest.id.trim().is_empty() {
                return Err(QuestError::Manifest("quest id must not be empty".to_owned()));
            }
            if !seen.insert(quest.id.as_str()) {
                return Err(QuestError::Manifest(format!(
                    "duplicate quest id '{}'",
                    quest.id
                )));
            }
            if quest.objectives.is_empty() {
                return Err(QuestError::Manifest(format!(
                    "quest '{}' has no objectives",
                    quest.id
                )));
            }
            validate_objectives(&quest.id, &quest.objectives)?;
        }
        Ok(())
    }

    /// Builds one definition per quest entry, all reading `flags`.
    #[must_use]
    pub fn definitions(&self, flags: &WorldFlags) -> Vec<ManifestQuest> {
        self.quests
            .iter()
            .map(|spec| ManifestQuest::new(spec.clone(), flags.clone()))
            .collect()
    }

    /// Builds a catalog containing every quest in the manifest.
    #[must_use]
    pub fn into_catalog(self, flags: &WorldFlags) -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        for definition in self.definitions(flags) {
            catalog.register(Arc::new(definition));
        }
        catalog
    }
}

fn validate_objectives(quest_id: &str, objectives: &[ObjectiveSpec]) -> Result<(), QuestError> {
    for objective in objectives {
        match &objective.kind {
            ObjectiveSpecKind::Flag { flag, .. } if flag.trim().is_empty() => {
                return Err(QuestError::Manifest(format!(
                    "quest '{quest_id}' has a flag objective without a flag"
                )));
            }
            ObjectiveSpecKind::Timer { seconds } if !seconds.is_finite() || *seconds < 0.0 => {
                return Err(QuestError::Manifest(format!(
                    "quest '{quest_id}' has a timer with invalid duration {seconds}"
                )));
            }
            ObjectiveSpecKind::Group { objectives, .. } => {
                if objectives.is_empty() {
                    return Err(QuestError::Manifest(format!(
                        "quest '{quest_id}' has an empty objective group"
                    )));
                }
                validate_objectives(quest_id, objectives)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Quest definition backed by a manifest entry.
#[derive(Debug)]
pub struct ManifestQuest {
    id: QuestId,
    name: String,
    spec: QuestSpec,
    flags: WorldFlags,
}

impl ManifestQuest {
    /// Wraps a validated spec.
    #[must_use]
    pub fn new(spec: QuestSpec, flags: WorldFlags) -> Self {
        Self {
            id: QuestId::new(spec.id.clone()),
            name: spec.name.clone().unwrap_or_else(|| spec.id.clone()),
            spec,
            flags,
        }
    }

    fn build(&self, spec: &ObjectiveSpec) -> ObjectiveNode {
        let mut node = match &spec.kind {
            ObjectiveSpecKind::Flag { flag, fail_flag } => {
                let mut objective = FlagObjective::new(flag.clone(), self.flags.clone());
                if let Some(fail_flag) = fail_flag {
                    objective = objective.failing_on(fail_flag.clone());
                }
                ObjectiveNode::task(objective)
            }
            ObjectiveSpecKind::Timer { seconds } => ObjectiveNode::task(TimerObjective::new(*seconds)),
            ObjectiveSpecKind::Group { mode, objectives } => ObjectiveNode::group(
                ObjectiveGroup::with_objectives(
                    *mode,
                    objectives.iter().map(|child| self.build(child)).collect(),
                ),
            ),
        };
        if let Some(label) = &spec.label {
            node = node.named(label.clone());
        }
        if spec.optional {
            node = node.optional();
        }
        if spec.hidden {
            node = node.hidden();
        }
        node
    }
}

impl QuestDefinition for ManifestQuest {
    fn id(&self) -> &QuestId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn create_objectives(&self) -> Vec<ObjectiveNode> {
        self.spec
            .objectives
            .iter()
            .map(|spec| self.build(spec))
            .collect()
    }

    fn can_be_started(&self) -> Result<(), StartDenial> {
        let missing: Vec<&str> = self
            .spec
            .requires
            .iter()
            .map(String::as_str)
            .filter(|flag| !self.flags.is_set(flag))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StartDenial::new(
                DenialCode::PrerequisiteUnmet,
                format!("missing flags: {}", missing.join(", ")),
            ))
        }
    }

    fn on_started(&self, quest: &QuestContext) {
        info!(quest = %quest.quest_id(), name = %self.name, "quest has been started");
    }

    fn on_completed(&self, quest: &QuestContext) {
        info!(quest = %quest.quest_id(), name = %self.name, "quest has been completed");
    }

    fn on_failed(&self, quest: &QuestContext) {
        info!(quest = %quest.quest_id(), name = %self.name, "quest has been failed");
    }
}
