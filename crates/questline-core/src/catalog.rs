//! Quest catalog abstraction.

use std::sync::Arc;

use crate::definition::QuestDefinition;
use crate::id::QuestId;

/// Resolves quest definitions by identity.
///
/// Lookups are deterministic: the same id always yields the same shared
/// definition for the lifetime of the catalog.
pub trait QuestCatalog: Send + Sync {
    /// Returns the definition registered under `id`, if any.
    fn resolve(&self, id: &QuestId) -> Option<Arc<dyn QuestDefinition>>;

    /// Returns `true` if `id` resolves to a definition.
    fn contains(&self, id: &QuestId) -> bool {
        self.resolve(id).is_some()
    }
}
