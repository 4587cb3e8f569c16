//! Questline Core — shared quest and objective abstractions.
//!
//! This crate defines the state model, the objective tree, and the
//! collaborator traits (catalog, tick source, clock) that the engine
//! evaluates. It contains no evaluation logic.

pub mod catalog;
pub mod clock;
pub mod context;
pub mod definition;
pub mod error;
pub mod event;
pub mod group;
pub mod id;
pub mod objective;
pub mod state;
pub mod tick;
