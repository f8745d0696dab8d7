//! JSON contracts the web client depends on: redacted password hashes,
//! lowercase status values, ISO-8601 dates and times, and the tagged
//! event envelope.

use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use medibook_core::events::{AppointmentEvent, DomainEvent, EventPayload};
use medibook_entity::appointment::AppointmentStatus;
use medibook_entity::slot::Slot;
use medibook_entity::user::{User, UserRole};
use medibook_service::stats::AdminStats;

fn sample_user() -> User {
    User {
        id: Uuid::new_v4(),
        username: "drwho".into(),
        email: "drwho@example.com".into(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".into(),
        display_name: Some("Dr. Who".into()),
        role: UserRole::Doctor,
        specialization: Some("Cardiology".into()),
        rating_avg: Some(4.5),
        rating_count: Some(12),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn password_hash_never_serializes() {
    let json = serde_json::to_value(sample_user()).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["username"], "drwho");
}

#[test]
fn statuses_and_roles_serialize_lowercase() {
    assert_eq!(
        serde_json::to_value(AppointmentStatus::Pending).unwrap(),
        "pending"
    );
    assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), "admin");
}

#[test]
fn slot_dates_and_times_are_iso8601() {
    let slot = Slot {
        id: Uuid::new_v4(),
        doctor_id: Uuid::new_v4(),
        slot_date: NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
        start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        is_booked: false,
        created_at: Utc::now(),
    };

    let json = serde_json::to_value(&slot).unwrap();
    assert_eq!(json["slot_date"], "2026-10-02");
    assert_eq!(json["start_time"], "09:30:00");
    assert_eq!(json["end_time"], "10:00:00");
}

#[test]
fn admin_stats_use_camel_case_keys() {
    let stats = AdminStats {
        doctors: 3,
        patients: 40,
        pending_appointments: 5,
        confirmed_appointments: 7,
        completed_appointments: 11,
        canceled_appointments: 2,
    };

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["pendingAppointments"], 5);
    assert!(json.get("pending_appointments").is_none());
}

#[test]
fn domain_events_carry_tagged_envelopes() {
    let event = DomainEvent::new(
        Uuid::new_v4(),
        EventPayload::Appointment(AppointmentEvent::Completed {
            appointment_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
        }),
    );

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["payload"]["domain"], "Appointment");
    assert_eq!(json["payload"]["event"]["type"], "Completed");
    assert!(json["id"].is_string());
    assert!(json["timestamp"].is_string());
}
