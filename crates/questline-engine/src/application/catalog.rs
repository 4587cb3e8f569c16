//! In-memory quest catalog.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use questline_core::catalog::QuestCatalog;
use questline_core::definition::QuestDefinition;
use questline_core::id::QuestId;

/// Catalog populated once at startup and read-only afterwards.
#[derive(Default)]
pub struct InMemoryCatalog {
    definitions: HashMap<QuestId, Arc<dyn QuestDefinition>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition under its own id, returning any definition it
    /// replaced.
    pub fn register(
        &mut self,
        definition: Arc<dyn QuestDefinition>,
    ) -> Option<Arc<dyn QuestDefinition>> {
        self.definitions.insert(definition.id().clone(), definition)
    }

    /// Builder form of [`InMemoryCatalog::register`].
    #[must_use]
    pub fn with_definition(mut self, definition: Arc<dyn QuestDefinition>) -> Self {
        self.register(definition);
        self
    }

    /// Registered ids in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<QuestId> {
        let mut ids: Vec<QuestId> = self.definitions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl QuestCatalog for InMemoryCatalog {
    fn resolve(&self, id: &QuestId) -> Option<Arc<dyn QuestDefinition>> {
        self.definitions.get(id).cloned()
    }
}

impl fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("ids", &self.ids())
            .finish()
    }
}
