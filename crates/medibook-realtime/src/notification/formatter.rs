//! Turns domain events into inbox deliveries.
//!
//! Pure mapping: which users get a row, with what text, pointing at
//! which entity. Dates render as ISO-8601 (`%Y-%m-%d`, `%H:%M`).

use uuid::Uuid;

use medibook_core::events::{AppointmentEvent, EventPayload, RatingEvent};
use medibook_entity::notification::NotificationKind;

/// One notification to persist and push.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Recipient user ID.
    pub user_id: Uuid,
    /// Notification category.
    pub kind: NotificationKind,
    /// Human-readable message.
    pub message: String,
    /// Related entity, if any.
    pub target_id: Option<Uuid>,
}

/// Maps an event payload to the notifications it produces.
pub fn deliveries_for(payload: &EventPayload) -> Vec<Delivery> {
    match payload {
        EventPayload::Appointment(event) => appointment_deliveries(event),
        EventPayload::Rating(event) => rating_deliveries(event),
    }
}

fn appointment_deliveries(event: &AppointmentEvent) -> Vec<Delivery> {
    match event {
        AppointmentEvent::Booked {
            appointment_id,
            doctor_id,
            slot_date,
            start_time,
            ..
        } => vec![Delivery {
            user_id: *doctor_id,
            kind: NotificationKind::Appointment,
            message: format!(
                "New appointment request for {} at {}",
                slot_date.format("%Y-%m-%d"),
                start_time.format("%H:%M"),
            ),
            target_id: Some(*appointment_id),
        }],
        AppointmentEvent::Confirmed {
            appointment_id,
            patient_id,
            slot_date,
            ..
        } => vec![Delivery {
            user_id: *patient_id,
            kind: NotificationKind::Appointment,
            message: format!(
                "Your appointment on {} has been confirmed",
                slot_date.format("%Y-%m-%d"),
            ),
            target_id: Some(*appointment_id),
        }],
        AppointmentEvent::Completed {
            appointment_id,
            patient_id,
            ..
        } => vec![Delivery {
            user_id: *patient_id,
            kind: NotificationKind::Appointment,
            message: "Your appointment has been completed. You can now rate your doctor"
                .to_string(),
            target_id: Some(*appointment_id),
        }],
        AppointmentEvent::Canceled {
            appointment_id,
            doctor_id,
            patient_id,
            canceled_by_patient,
            reason,
        } => {
            // Only the party that did not cancel is notified.
            let (recipient, mut message) = if *canceled_by_patient {
                (*doctor_id, "An appointment was canceled by the patient".to_string())
            } else {
                (*patient_id, "Your appointment has been canceled".to_string())
            };
            if let Some(reason) = reason.as_deref().filter(|r| !r.trim().is_empty()) {
                message.push_str(": ");
                message.push_str(reason);
            }
            vec![Delivery {
                user_id: recipient,
                kind: NotificationKind::Appointment,
                message,
                target_id: Some(*appointment_id),
            }]
        }
        AppointmentEvent::Rescheduled {
            appointment_id,
            patient_id,
            slot_date,
            start_time,
            end_time,
            ..
        } => vec![Delivery {
            user_id: *patient_id,
            kind: NotificationKind::Appointment,
            message: format!(
                "Your appointment has been moved to {} {}-{}",
                slot_date.format("%Y-%m-%d"),
                start_time.format("%H:%M"),
                end_time.format("%H:%M"),
            ),
            target_id: Some(*appointment_id),
        }],
        AppointmentEvent::Deleted {
            appointment_id,
            doctor_id,
            patient_id,
        } => vec![
            Delivery {
                user_id: *patient_id,
                kind: NotificationKind::System,
                message: "An appointment was removed by an administrator".to_string(),
                target_id: Some(*appointment_id),
            },
            Delivery {
                user_id: *doctor_id,
                kind: NotificationKind::System,
                message: "An appointment was removed by an administrator".to_string(),
                target_id: Some(*appointment_id),
            },
        ],
    }
}

fn rating_deliveries(event: &RatingEvent) -> Vec<Delivery> {
    match event {
        RatingEvent::Submitted {
            rating_id,
            doctor_id,
            rating,
            ..
        } => vec![Delivery {
            user_id: *doctor_id,
            kind: NotificationKind::Rating,
            message: format!("You received a new {rating}-star rating"),
            target_id: Some(*rating_id),
        }],
        RatingEvent::Updated {
            rating_id,
            doctor_id,
            rating,
            ..
        } => vec![Delivery {
            user_id: *doctor_id,
            kind: NotificationKind::Rating,
            message: format!("A patient revised their rating of you to {rating} stars"),
            target_id: Some(*rating_id),
        }],
        // Removal is an admin action; the doctor sees the change through
        // their dashboard refresh, no inbox row.
        RatingEvent::Removed { .. } => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn ids() -> (Uuid, Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_booked_notifies_doctor() {
        let (appt, doctor, patient) = ids();
        let payload = EventPayload::Appointment(AppointmentEvent::Booked {
            appointment_id: appt,
            doctor_id: doctor,
            patient_id: patient,
            slot_id: Uuid::new_v4(),
            slot_date: NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        });

        let deliveries = deliveries_for(&payload);
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].user_id, doctor);
        assert_eq!(deliveries[0].kind, NotificationKind::Appointment);
        assert!(deliveries[0].message.contains("2026-09-14"));
        assert!(deliveries[0].message.contains("09:30"));
        assert_eq!(deliveries[0].target_id, Some(appt));
    }

    #[test]
    fn test_patient_cancel_notifies_doctor_with_reason() {
        let (appt, doctor, patient) = ids();
        let payload = EventPayload::Appointment(AppointmentEvent::Canceled {
            appointment_id: appt,
            doctor_id: doctor,
            patient_id: patient,
            canceled_by_patient: true,
            reason: Some("feeling better".to_string()),
        });

        let deliveries = deliveries_for(&payload);
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].user_id, doctor);
        assert!(deliveries[0].message.ends_with(": feeling better"));
    }

    #[test]
    fn test_doctor_cancel_notifies_patient_without_reason_suffix() {
        let (appt, doctor, patient) = ids();
        let payload = EventPayload::Appointment(AppointmentEvent::Canceled {
            appointment_id: appt,
            doctor_id: doctor,
            patient_id: patient,
            canceled_by_patient: false,
            reason: None,
        });

        let deliveries = deliveries_for(&payload);
        assert_eq!(deliveries[0].user_id, patient);
        assert!(!deliveries[0].message.contains(':'));
    }

    #[test]
    fn test_admin_delete_notifies_both_parties() {
        let (appt, doctor, patient) = ids();
        let payload = EventPayload::Appointment(AppointmentEvent::Deleted {
            appointment_id: appt,
            doctor_id: doctor,
            patient_id: patient,
        });

        let deliveries = deliveries_for(&payload);
        let recipients: Vec<Uuid> = deliveries.iter().map(|d| d.user_id).collect();
        assert_eq!(deliveries.len(), 2);
        assert!(recipients.contains(&doctor));
        assert!(recipients.contains(&patient));
    }

    #[test]
    fn test_rating_submitted_notifies_doctor() {
        let (rating_id, doctor, patient) = ids();
        let payload = EventPayload::Rating(RatingEvent::Submitted {
            rating_id,
            doctor_id: doctor,
            patient_id: patient,
            rating: 4.5,
        });

        let deliveries = deliveries_for(&payload);
        assert_eq!(deliveries[0].user_id, doctor);
        assert_eq!(deliveries[0].kind, NotificationKind::Rating);
        assert!(deliveries[0].message.contains("4.5"));
    }

    #[test]
    fn test_rating_removed_produces_no_inbox_row() {
        let payload = EventPayload::Rating(RatingEvent::Removed {
            rating_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
        });
        assert!(deliveries_for(&payload).is_empty());
    }
}
