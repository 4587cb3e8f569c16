//! Tick source abstraction.
//!
//! A tick source calls its subscribers once per simulation step with the
//! elapsed time in seconds. The engine never schedules anything itself.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::trace;

/// Callback invoked once per tick with the elapsed seconds.
pub type TickCallback = Box<dyn FnMut(f32) + Send>;

/// Handle returned by [`TickSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Something that drives time forward.
pub trait TickSource: Send + Sync {
    /// Registers a callback. Every call adds a new subscription.
    fn subscribe(&self, callback: TickCallback) -> SubscriptionId;

    /// Removes a subscription. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Tick source stepped explicitly by the host, once per frame or turn.
///
/// Callbacks run while the subscriber list is locked, so they must not
/// subscribe or unsubscribe on the same source.
#[derive(Default)]
pub struct ManualTickSource {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, TickCallback)>>,
}

impl ManualTickSource {
    /// Creates a source with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes every subscriber in subscription order. Returns how many
    /// callbacks ran.
    pub fn tick(&self, delta_time: f32) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        trace!(delta_time, subscribers = subscribers.len(), "tick");
        for (_, callback) in subscribers.iter_mut() {
            callback(delta_time);
        }
        subscribers.len()
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl TickSource for ManualTickSource {
    fn subscribe(&self, callback: TickCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }
}

impl fmt::Debug for ManualTickSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTickSource")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}
