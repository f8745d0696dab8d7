//! Appointment-related domain events.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to the appointment lifecycle and slot management.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AppointmentEvent {
    /// A patient booked a slot; the appointment is now pending.
    Booked {
        /// The new appointment ID.
        appointment_id: Uuid,
        /// The doctor who owns the slot.
        doctor_id: Uuid,
        /// The booking patient.
        patient_id: Uuid,
        /// The claimed slot.
        slot_id: Uuid,
        /// The slot date.
        slot_date: NaiveDate,
        /// The slot start time.
        start_time: NaiveTime,
    },
    /// A doctor confirmed a pending appointment.
    Confirmed {
        /// The appointment ID.
        appointment_id: Uuid,
        /// The patient to notify.
        patient_id: Uuid,
        /// The doctor who confirmed.
        doctor_id: Uuid,
        /// The slot date.
        slot_date: NaiveDate,
    },
    /// A doctor completed a confirmed appointment.
    Completed {
        /// The appointment ID.
        appointment_id: Uuid,
        /// The patient to notify.
        patient_id: Uuid,
        /// The doctor who completed it.
        doctor_id: Uuid,
    },
    /// An appointment was canceled; the slot is free again.
    Canceled {
        /// The appointment ID.
        appointment_id: Uuid,
        /// The doctor on the appointment.
        doctor_id: Uuid,
        /// The patient on the appointment.
        patient_id: Uuid,
        /// Who canceled: determines which party is notified.
        canceled_by_patient: bool,
        /// Reason, when one was supplied.
        reason: Option<String>,
    },
    /// A booked slot's date/time was edited; the patient must be told.
    Rescheduled {
        /// The affected appointment ID.
        appointment_id: Uuid,
        /// The patient to notify.
        patient_id: Uuid,
        /// The doctor who owns the slot.
        doctor_id: Uuid,
        /// The new slot date.
        slot_date: NaiveDate,
        /// The new start time.
        start_time: NaiveTime,
        /// The new end time.
        end_time: NaiveTime,
    },
    /// An admin deleted an appointment outright.
    Deleted {
        /// The removed appointment ID.
        appointment_id: Uuid,
        /// The doctor on the appointment.
        doctor_id: Uuid,
        /// The patient on the appointment.
        patient_id: Uuid,
    },
}

impl AppointmentEvent {
    /// The doctor involved in this event.
    pub fn doctor_id(&self) -> Uuid {
        match self {
            Self::Booked { doctor_id, .. }
            | Self::Confirmed { doctor_id, .. }
            | Self::Completed { doctor_id, .. }
            | Self::Canceled { doctor_id, .. }
            | Self::Rescheduled { doctor_id, .. }
            | Self::Deleted { doctor_id, .. } => *doctor_id,
        }
    }
}
