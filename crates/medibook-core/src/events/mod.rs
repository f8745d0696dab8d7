//! Domain events emitted by MediBook operations.
//!
//! Events are produced by the service layer and consumed by the real-time
//! engine, which turns them into persisted notifications and live pushes.
//! The [`EventSink`] trait is the seam between the two: services depend on
//! the trait only, so business logic never touches WebSocket plumbing.

pub mod appointment;
pub mod rating;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use appointment::AppointmentEvent;
pub use rating::RatingEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event.
    pub actor_id: Uuid,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// An appointment-related event.
    Appointment(AppointmentEvent),
    /// A rating-related event.
    Rating(RatingEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Uuid, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }
}

/// Consumer of domain events.
///
/// Implemented by the real-time notification dispatcher. Delivery is
/// at-least-once: a sink may persist and push the same logical event more
/// than once (e.g. on reconnect replay), and clients dedupe by
/// notification identifier.
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    /// Consume a single domain event.
    async fn publish(&self, event: DomainEvent);
}

/// A sink that drops every event. Used in tests and tooling where no
/// real-time engine is running.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

#[async_trait::async_trait]
impl EventSink for NullEventSink {
    async fn publish(&self, event: DomainEvent) {
        tracing::trace!(event_id = %event.id, "Event dropped by null sink");
    }
}
