//! Appointment status enumeration and transition table.
//!
//! The status domain is closed: `Pending → Confirmed → Completed`, with
//! `Canceled` reachable from `Pending` or `Confirmed`. `Completed` and
//! `Canceled` are terminal. The service layer rejects illegal
//! transitions through [`AppointmentStatus::can_transition_to`]; the
//! guarded SQL updates then re-check the source status, so a concurrent
//! transition loses cleanly instead of double-applying.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Booked by a patient, awaiting doctor confirmation.
    Pending,
    /// Confirmed by the doctor.
    Confirmed,
    /// Carried out; the slot remains historically consumed.
    Completed,
    /// Canceled by either party; the slot is free again.
    Canceled,
}

impl AppointmentStatus {
    /// Whether the appointment currently holds its slot.
    pub fn holds_slot(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&next)
    }

    /// All legal next statuses from this one.
    pub fn valid_transitions(&self) -> &'static [AppointmentStatus] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Canceled],
            Self::Confirmed => &[Self::Completed, Self::Canceled],
            Self::Completed => &[],
            Self::Canceled => &[],
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = medibook_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            _ => Err(medibook_core::AppError::validation(format!(
                "Invalid appointment status: '{s}'. Expected one of: pending, confirmed, completed, canceled"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use AppointmentStatus::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
    }

    #[test]
    fn test_cancel_reachable_from_active_states_only() {
        assert!(Pending.can_transition_to(Canceled));
        assert!(Confirmed.can_transition_to(Canceled));
        assert!(!Completed.can_transition_to(Canceled));
        assert!(!Canceled.can_transition_to(Canceled));
    }

    #[test]
    fn test_all_illegal_transitions_rejected() {
        let all = [Pending, Confirmed, Completed, Canceled];
        let legal = [
            (Pending, Confirmed),
            (Pending, Canceled),
            (Confirmed, Completed),
            (Confirmed, Canceled),
        ];
        for from in all {
            for to in all {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {expected}"
                );
            }
        }
    }

    #[test]
    fn test_slot_holding() {
        assert!(Pending.holds_slot());
        assert!(Confirmed.holds_slot());
        assert!(!Completed.holds_slot());
        assert!(!Canceled.holds_slot());
    }

    #[test]
    fn test_from_str_accepts_both_spellings_of_canceled() {
        assert_eq!("canceled".parse::<AppointmentStatus>().unwrap(), Canceled);
        assert_eq!("Cancelled".parse::<AppointmentStatus>().unwrap(), Canceled);
    }
}
