//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a notification, used by clients to route taps to the
/// right screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Appointment lifecycle: booked, confirmed, completed, canceled,
    /// rescheduled.
    Appointment,
    /// A new or revised doctor rating.
    Rating,
    /// Anything else (account changes, admin messages).
    System,
}

impl NotificationKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Rating => "rating",
            Self::System => "system",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
