//! Domain layer for quest evaluation.

pub mod aggregates;
pub mod evaluation;
pub mod events;
