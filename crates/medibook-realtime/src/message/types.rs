//! Inbound and outbound WebSocket message type definitions.
//!
//! Outbound tags are the event names clients switch on. Notification
//! pushes carry the persisted row's id so clients receiving a duplicate
//! (at-least-once delivery) can dedupe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medibook_entity::notification::{Notification, NotificationKind};

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundMessage {
    /// Keepalive probe; the server answers with `pong`.
    Ping,
    /// Mark a notification as read from this tab.
    MarkRead {
        /// Notification ID.
        #[serde(rename = "notificationId")]
        notification_id: Uuid,
    },
}

/// Messages pushed by the server to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundMessage {
    /// A new inbox notification.
    Notification {
        /// Persisted notification ID (dedupe key).
        id: Uuid,
        /// Notification category.
        kind: NotificationKind,
        /// Human-readable message.
        message: String,
        /// Related entity (appointment or rating), if any.
        #[serde(rename = "targetId")]
        target_id: Option<Uuid>,
        /// When the notification was created.
        #[serde(rename = "createdAt")]
        created_at: DateTime<Utc>,
    },
    /// Read-state change, so other open tabs converge.
    NotificationRead {
        /// The notification marked read; `None` means all were marked.
        #[serde(rename = "notificationId")]
        notification_id: Option<Uuid>,
    },
    /// Hint for a doctor dashboard to refetch its summary.
    DoctorDashboardUpdate {
        /// The doctor whose data changed.
        #[serde(rename = "doctorId")]
        doctor_id: Uuid,
    },
    /// Hint for admin dashboards to refetch their summaries.
    AdminDashboardUpdate,
    /// Keepalive answer.
    Pong,
}

impl From<&Notification> for OutboundMessage {
    fn from(n: &Notification) -> Self {
        OutboundMessage::Notification {
            id: n.id,
            kind: n.kind.clone(),
            message: n.message.clone(),
            target_id: n.target_id,
            created_at: n.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_tags_are_kebab_case() {
        let msg = OutboundMessage::DoctorDashboardUpdate {
            doctor_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "doctor-dashboard-update");

        let json = serde_json::to_value(&OutboundMessage::AdminDashboardUpdate).unwrap();
        assert_eq!(json["type"], "admin-dashboard-update");
    }

    #[test]
    fn test_notification_read_all_serializes_null_id() {
        let json = serde_json::to_value(&OutboundMessage::NotificationRead {
            notification_id: None,
        })
        .unwrap();
        assert_eq!(json["type"], "notification-read");
        assert!(json["notificationId"].is_null());
    }

    #[test]
    fn test_inbound_mark_read_parses() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"type":"mark-read","notificationId":"{id}"}}"#);
        let msg: InboundMessage = serde_json::from_str(&raw).unwrap();
        match msg {
            InboundMessage::MarkRead { notification_id } => assert_eq!(notification_id, id),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
