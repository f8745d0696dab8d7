//! Appointment domain entities.

pub mod model;
pub mod status;

pub use model::{Appointment, AppointmentView};
pub use status::AppointmentStatus;
