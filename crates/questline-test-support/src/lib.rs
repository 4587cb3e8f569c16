//! Shared test doubles and utilities for the Questline engine.

mod clock;
mod hooks;
mod objective;
mod quest;

pub use clock::FixedClock;
pub use hooks::HookLog;
pub use objective::{ObjectiveSwitch, ScriptedObjective};
pub use quest::RecordingQuest;
