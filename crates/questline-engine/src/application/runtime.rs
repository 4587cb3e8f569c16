//! Process-wide quest runtime: a shared registry hooked onto a tick source.

use std::sync::{Arc, Mutex, MutexGuard};

use questline_core::definition::QuestDefinition;
use questline_core::error::QuestError;
use questline_core::id::{QuestId, QuestInstanceId};
use questline_core::tick::{SubscriptionId, TickSource};
use tracing::{debug, warn};

use super::registry::QuestRegistry;
use crate::domain::events::QuestEvent;

/// Owns the shared registry and its single subscription to a tick source.
///
/// The subscription is made lazily on the first start request and is kept
/// until [`QuestRuntime::teardown`] (or drop). Repeated hooking never adds a
/// second subscription, so every instance is ticked once per source tick.
pub struct QuestRuntime {
    registry: Arc<Mutex<QuestRegistry>>,
    source: Arc<dyn TickSource>,
    subscription: Option<SubscriptionId>,
}

impl QuestRuntime {
    /// Wraps `registry`. Nothing is subscribed until the first start.
    #[must_use]
    pub fn new(registry: QuestRegistry, source: Arc<dyn TickSource>) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
            source,
            subscription: None,
        }
    }

    /// Returns `true` while subscribed to the tick source.
    #[must_use]
    pub fn is_hooked(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribes the registry's tick to the source unless already done.
    pub fn ensure_hooked(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        let registry = Arc::clone(&self.registry);
        let id = self.source.subscribe(Box::new(move |delta_time| {
            match registry.lock() {
                Ok(mut registry) => registry.tick(delta_time),
                Err(_) => warn!("quest registry lock poisoned; skipping tick"),
            }
        }));
        debug!(subscription = id.get(), "quest runtime hooked to tick source");
        self.subscription = Some(id);
    }

    /// Starts the quest registered under `quest_id`, hooking first.
    ///
    /// # Errors
    ///
    /// Returns the registry's error, or `QuestError::RegistryUnavailable` if
    /// the registry lock is poisoned.
    pub fn start_quest(&mut self, quest_id: &QuestId) -> Result<QuestInstanceId, QuestError> {
        self.ensure_hooked();
        self.lock()?.start_quest(quest_id)
    }

    /// Starts `definition` directly, hooking first.
    ///
    /// # Errors
    ///
    /// Returns the registry's error, or `QuestError::RegistryUnavailable` if
    /// the registry lock is poisoned.
    pub fn start_definition(
        &mut self,
        definition: Arc<dyn QuestDefinition>,
    ) -> Result<QuestInstanceId, QuestError> {
        self.ensure_hooked();
        self.lock()?.start_definition(definition)
    }

    /// Force-completes the first in-progress instance of `quest_id`.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::RegistryUnavailable` if the registry lock is
    /// poisoned.
    pub fn complete_quest(&self, quest_id: &QuestId) -> Result<bool, QuestError> {
        Ok(self.lock()?.complete_quest(quest_id))
    }

    /// Force-fails the first in-progress instance of `quest_id`.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::RegistryUnavailable` if the registry lock is
    /// poisoned.
    pub fn fail_quest(&self, quest_id: &QuestId) -> Result<bool, QuestError> {
        Ok(self.lock()?.fail_quest(quest_id))
    }

    /// Hands out every pending journal event.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::RegistryUnavailable` if the registry lock is
    /// poisoned.
    pub fn drain_events(&self) -> Result<Vec<QuestEvent>, QuestError> {
        Ok(self.lock()?.drain_events())
    }

    /// Runs `f` with exclusive access to the registry.
    ///
    /// Must not be called from inside a quest or objective hook, which runs
    /// while the registry is already locked by a tick.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::RegistryUnavailable` if the registry lock is
    /// poisoned.
    pub fn with_registry<T>(
        &self,
        f: impl FnOnce(&mut QuestRegistry) -> T,
    ) -> Result<T, QuestError> {
        Ok(f(&mut *self.lock()?))
    }

    /// Locks the registry.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::RegistryUnavailable` if the lock is poisoned.
    pub fn lock(&self) -> Result<MutexGuard<'_, QuestRegistry>, QuestError> {
        self.registry
            .lock()
            .map_err(|e| QuestError::RegistryUnavailable(e.to_string()))
    }

    /// Drops every instance without hooks and releases the tick subscription.
    pub fn teardown(&mut self) {
        match self.registry.lock() {
            Ok(mut registry) => registry.clear_all(),
            Err(poisoned) => poisoned.into_inner().clear_all(),
        }
        if let Some(id) = self.subscription.take() {
            self.source.unsubscribe(id);
            debug!(subscription = id.get(), "quest runtime unhooked");
        }
    }
}

impl Drop for QuestRuntime {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for QuestRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestRuntime")
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}
