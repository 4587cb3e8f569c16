//! Application layer: catalog, manifest loading, registry, and runtime.

pub mod catalog;
pub mod manifest;
pub mod registry;
pub mod runtime;
