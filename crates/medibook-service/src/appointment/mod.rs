//! Appointment engine.

pub mod service;

pub use service::{AdminAppointmentUpdate, AppointmentService, RECENT_LIMIT};
