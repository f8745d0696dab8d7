//! Routes domain events to the durable inbox and live connections.

use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use medibook_core::events::{DomainEvent, EventPayload, EventSink};
use medibook_database::repositories::notification::NotificationRepository;
use medibook_entity::notification::NotificationKind;
use medibook_entity::user::UserRole;

use crate::connection::manager::ConnectionManager;
use crate::message::OutboundMessage;

use super::formatter;

/// Consumes domain events: persists inbox rows, pushes them to live
/// connections, and broadcasts dashboard refresh hints.
///
/// Persist-then-push: the row exists before any socket sees it, so an
/// offline recipient finds it in the inbox and an online one may see it
/// twice at worst (dedupe by id).
pub struct NotificationDispatcher {
    connections: Arc<ConnectionManager>,
    notification_repo: Arc<NotificationRepository>,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        connections: Arc<ConnectionManager>,
        notification_repo: Arc<NotificationRepository>,
    ) -> Self {
        Self {
            connections,
            notification_repo,
        }
    }

    /// Persists one notification and pushes it to the recipient's live
    /// connections.
    pub async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        message: &str,
        target_id: Option<Uuid>,
    ) {
        match self
            .notification_repo
            .create(user_id, kind, message, target_id)
            .await
        {
            Ok(notification) => {
                let pushed = self
                    .connections
                    .send_to_user(&user_id, &OutboundMessage::from(&notification));
                debug!(
                    notification_id = %notification.id,
                    user_id = %user_id,
                    connections = pushed,
                    "Notification dispatched"
                );
            }
            // The push is best-effort on top of the inbox; a failed
            // insert means the recipient would silently miss the event,
            // so it is logged loudly.
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to persist notification");
            }
        }
    }

    /// Pushes a read-state change to the user's other open tabs.
    pub fn push_read(&self, user_id: Uuid, notification_id: Option<Uuid>) {
        self.connections
            .send_to_user(&user_id, &OutboundMessage::NotificationRead { notification_id });
    }

    /// Broadcasts dashboard refresh hints for an event: the involved
    /// doctor's dashboard plus every admin dashboard. Not persisted.
    fn broadcast_dashboards(&self, payload: &EventPayload) {
        let doctor_id = match payload {
            EventPayload::Appointment(event) => event.doctor_id(),
            EventPayload::Rating(event) => match event {
                medibook_core::events::RatingEvent::Submitted { doctor_id, .. }
                | medibook_core::events::RatingEvent::Updated { doctor_id, .. }
                | medibook_core::events::RatingEvent::Removed { doctor_id, .. } => *doctor_id,
            },
        };

        self.connections
            .send_to_user(&doctor_id, &OutboundMessage::DoctorDashboardUpdate { doctor_id });
        self.connections
            .send_to_role(&UserRole::Admin, &OutboundMessage::AdminDashboardUpdate);
    }
}

#[async_trait::async_trait]
impl EventSink for NotificationDispatcher {
    async fn publish(&self, event: DomainEvent) {
        for delivery in formatter::deliveries_for(&event.payload) {
            self.notify(
                delivery.user_id,
                delivery.kind,
                &delivery.message,
                delivery.target_id,
            )
            .await;
        }
        self.broadcast_dashboards(&event.payload);
    }
}
