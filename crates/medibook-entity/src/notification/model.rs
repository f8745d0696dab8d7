//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::NotificationKind;

/// A notification delivered to a user's durable inbox.
///
/// Immutable after creation except for the read flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier. Clients dedupe replayed pushes
    /// by this value.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification category.
    pub kind: NotificationKind,
    /// Human-readable message text.
    pub message: String,
    /// The entity this notification points at (appointment, rating, slot).
    pub target_id: Option<Uuid>,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification is unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}
