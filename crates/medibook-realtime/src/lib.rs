//! # medibook-realtime
//!
//! WebSocket push engine for MediBook:
//!
//! - connection pool keyed by user, multiple tabs per user
//! - notification dispatch (persist first, then push, at-least-once)
//! - dashboard refresh broadcasts for doctors and admins
//!
//! The engine consumes domain events through the
//! [`medibook_core::events::EventSink`] trait; services never hold a
//! reference to a socket.

pub mod connection;
pub mod message;
pub mod notification;

pub use connection::manager::ConnectionManager;
pub use message::{InboundMessage, OutboundMessage};
pub use notification::dispatcher::NotificationDispatcher;
