//! Appointment entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::AppointmentStatus;

/// A patient's claim on a slot, carrying a lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    /// Unique appointment identifier.
    pub id: Uuid,
    /// The doctor on the appointment.
    pub doctor_id: Uuid,
    /// The booking patient.
    pub patient_id: Uuid,
    /// The claimed slot.
    pub slot_id: Uuid,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Patient-supplied notes at booking time.
    pub notes: Option<String>,
    /// Doctor's comment, set on completion.
    pub doctor_comment: Option<String>,
    /// Cancellation reason, set on cancellation.
    pub cancel_reason: Option<String>,
    /// When the appointment was created.
    pub created_at: DateTime<Utc>,
    /// When the appointment was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An appointment joined with its slot timing and party display names,
/// as returned by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppointmentView {
    /// Unique appointment identifier.
    pub id: Uuid,
    /// The doctor on the appointment.
    pub doctor_id: Uuid,
    /// The booking patient.
    pub patient_id: Uuid,
    /// The claimed slot.
    pub slot_id: Uuid,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Patient-supplied notes.
    pub notes: Option<String>,
    /// Doctor's comment.
    pub doctor_comment: Option<String>,
    /// Cancellation reason.
    pub cancel_reason: Option<String>,
    /// Slot calendar day.
    pub slot_date: NaiveDate,
    /// Slot start time.
    pub start_time: NaiveTime,
    /// Slot end time.
    pub end_time: NaiveTime,
    /// Doctor display name.
    pub doctor_name: String,
    /// Patient display name.
    pub patient_name: String,
    /// When the appointment was created.
    pub created_at: DateTime<Utc>,
}
