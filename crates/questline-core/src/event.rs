//! Metadata shared by quest journal events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::{QuestId, QuestInstanceId};

/// Metadata attached to every journal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Dotted type name, e.g. `quest.completed`.
    pub event_type: String,
    /// Instance that produced the event.
    pub instance_id: QuestInstanceId,
    /// Definition the instance was created from.
    pub quest_id: QuestId,
    /// Monotonically increasing position within the instance journal.
    pub sequence_number: i64,
    /// Timestamp of the transition.
    pub occurred_at: DateTime<Utc>,
}
