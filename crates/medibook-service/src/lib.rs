//! # medibook-service
//!
//! Business services for MediBook. Each service owns one domain area and
//! enforces its invariants: `SlotService` (availability and overlap
//! rules), `AppointmentService` (the booking state machine),
//! `RatingService` (eligibility gating), `NotificationService` (inbox),
//! `UserService` (registration and login), and `StatsService` (admin
//! aggregates).
//!
//! Services emit [`medibook_core::events::DomainEvent`]s through an
//! injected sink; they never talk to WebSockets directly.

pub mod appointment;
pub mod context;
pub mod notification;
pub mod rating;
pub mod slot;
pub mod stats;
pub mod user;

pub use context::RequestContext;
