//! Connection lifecycle and message routing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use medibook_core::config::RealtimeConfig;
use medibook_entity::user::UserRole;

use crate::message::OutboundMessage;

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: ConnectionPool,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            pool: ConnectionPool::new(),
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the handle and the receiver half of its outbound queue.
    /// When the user is already at the per-user connection cap, the
    /// oldest connection is evicted.
    pub fn register(
        &self,
        user_id: Uuid,
        role: UserRole,
        username: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, role, username, tx));

        let existing = self.pool.user_connections(&user_id);
        if existing.len() >= self.config.max_connections_per_user {
            if let Some(oldest) = existing.first() {
                warn!(
                    user_id = %user_id,
                    evicted = %oldest.id,
                    max = self.config.max_connections_per_user,
                    "Connection cap reached, evicting oldest"
                );
                oldest.mark_dead();
                self.pool.remove(&oldest.id);
            }
        }

        self.pool.add(handle.clone());
        info!(conn_id = %handle.id, user_id = %user_id, "WebSocket connection registered");

        (handle, rx)
    }

    /// Unregisters a connection.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_dead();
            debug!(conn_id = %conn_id, user_id = %handle.user_id, "Connection unregistered");
        }
    }

    /// Whether the user has at least one live connection.
    pub fn is_online(&self, user_id: &Uuid) -> bool {
        !self.pool.user_connections(user_id).is_empty()
    }

    /// Pushes a message to every live connection of a user. Returns the
    /// number of connections the message was queued on.
    pub fn send_to_user(&self, user_id: &Uuid, msg: &OutboundMessage) -> usize {
        self.pool
            .user_connections(user_id)
            .iter()
            .filter(|c| c.send(msg.clone()))
            .count()
    }

    /// Pushes a message to every connection held by users with a role.
    pub fn send_to_role(&self, role: &UserRole, msg: &OutboundMessage) -> usize {
        self.pool
            .connections_with_role(role)
            .iter()
            .filter(|c| c.send(msg.clone()))
            .count()
    }

    /// Total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConnectionManager {
        ConnectionManager::new(RealtimeConfig {
            max_connections_per_user: 2,
            channel_buffer_size: 8,
        })
    }

    #[tokio::test]
    async fn test_register_and_send() {
        let mgr = manager();
        let user = Uuid::new_v4();
        let (_handle, mut rx) = mgr.register(user, UserRole::Patient, "alice".into());

        assert!(mgr.is_online(&user));
        assert_eq!(mgr.send_to_user(&user, &OutboundMessage::Pong), 1);
        assert!(matches!(rx.recv().await, Some(OutboundMessage::Pong)));
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let mgr = manager();
        let user = Uuid::new_v4();
        let (first, _rx1) = mgr.register(user, UserRole::Patient, "alice".into());
        let (_second, _rx2) = mgr.register(user, UserRole::Patient, "alice".into());
        let (_third, _rx3) = mgr.register(user, UserRole::Patient, "alice".into());

        assert_eq!(mgr.connection_count(), 2);
        assert!(!first.is_alive());
    }

    #[tokio::test]
    async fn test_unregister_takes_user_offline() {
        let mgr = manager();
        let user = Uuid::new_v4();
        let (handle, _rx) = mgr.register(user, UserRole::Doctor, "drwho".into());

        mgr.unregister(&handle.id);
        assert!(!mgr.is_online(&user));
        assert_eq!(mgr.send_to_user(&user, &OutboundMessage::Pong), 0);
    }

    #[tokio::test]
    async fn test_role_broadcast_only_hits_role() {
        let mgr = manager();
        let admin = Uuid::new_v4();
        let patient = Uuid::new_v4();
        let (_a, mut admin_rx) = mgr.register(admin, UserRole::Admin, "root".into());
        let (_p, _patient_rx) = mgr.register(patient, UserRole::Patient, "bob".into());

        assert_eq!(
            mgr.send_to_role(&UserRole::Admin, &OutboundMessage::AdminDashboardUpdate),
            1
        );
        assert!(matches!(
            admin_rx.recv().await,
            Some(OutboundMessage::AdminDashboardUpdate)
        ));
    }
}
