//! Questline — objective-tree evaluation engine.
//!
//! Responsible for per-tick objective evaluation, quest instance state
//! transitions, the instance registry, and data-driven quest manifests.

pub mod application;
pub mod domain;
