//! End-to-end push flow without a database: domain events are formatted
//! into deliveries, queued through the connection manager, and arrive on
//! the right sockets with the wire tags clients switch on.

use uuid::Uuid;

use medibook_core::config::RealtimeConfig;
use medibook_core::events::{AppointmentEvent, EventPayload};
use medibook_entity::user::UserRole;
use medibook_realtime::message::OutboundMessage;
use medibook_realtime::notification::formatter;
use medibook_realtime::ConnectionManager;

fn manager() -> ConnectionManager {
    ConnectionManager::new(RealtimeConfig {
        max_connections_per_user: 3,
        channel_buffer_size: 16,
    })
}

fn booked_event(doctor_id: Uuid, patient_id: Uuid) -> EventPayload {
    EventPayload::Appointment(AppointmentEvent::Booked {
        appointment_id: Uuid::new_v4(),
        doctor_id,
        patient_id,
        slot_id: Uuid::new_v4(),
        slot_date: chrono::NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
        start_time: chrono::NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
    })
}

#[tokio::test]
async fn booking_reaches_every_doctor_tab() {
    let mgr = manager();
    let doctor = Uuid::new_v4();
    let patient = Uuid::new_v4();

    let (_h1, mut tab1) = mgr.register(doctor, UserRole::Doctor, "drwho".into());
    let (_h2, mut tab2) = mgr.register(doctor, UserRole::Doctor, "drwho".into());

    let deliveries = formatter::deliveries_for(&booked_event(doctor, patient));
    assert_eq!(deliveries.len(), 1);

    let msg = OutboundMessage::Notification {
        id: Uuid::new_v4(),
        kind: deliveries[0].kind,
        message: deliveries[0].message.clone(),
        target_id: deliveries[0].target_id,
        created_at: chrono::Utc::now(),
    };

    assert_eq!(mgr.send_to_user(&doctor, &msg), 2);

    for rx in [&mut tab1, &mut tab2] {
        match rx.recv().await {
            Some(OutboundMessage::Notification { message, .. }) => {
                assert!(message.contains("2026-10-02"));
            }
            other => panic!("expected a notification, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn dashboard_hints_reach_doctor_and_admins_only() {
    let mgr = manager();
    let doctor = Uuid::new_v4();
    let admin = Uuid::new_v4();
    let patient = Uuid::new_v4();

    let (_d, mut doctor_rx) = mgr.register(doctor, UserRole::Doctor, "drwho".into());
    let (_a, mut admin_rx) = mgr.register(admin, UserRole::Admin, "root".into());
    let (_p, mut patient_rx) = mgr.register(patient, UserRole::Patient, "alice".into());

    mgr.send_to_user(&doctor, &OutboundMessage::DoctorDashboardUpdate { doctor_id: doctor });
    mgr.send_to_role(&UserRole::Admin, &OutboundMessage::AdminDashboardUpdate);

    assert!(matches!(
        doctor_rx.recv().await,
        Some(OutboundMessage::DoctorDashboardUpdate { .. })
    ));
    assert!(matches!(
        admin_rx.recv().await,
        Some(OutboundMessage::AdminDashboardUpdate)
    ));

    // The patient's queue stays empty.
    assert!(patient_rx.try_recv().is_err());
}

#[tokio::test]
async fn wire_format_matches_client_expectations() {
    let notification = OutboundMessage::Notification {
        id: Uuid::new_v4(),
        kind: medibook_entity::notification::NotificationKind::Appointment,
        message: "Your appointment on 2026-10-02 has been confirmed".into(),
        target_id: Some(Uuid::new_v4()),
        created_at: chrono::Utc::now(),
    };

    let json = serde_json::to_value(&notification).unwrap();
    assert_eq!(json["type"], "notification");
    assert_eq!(json["kind"], "appointment");
    assert!(json["targetId"].is_string());
    assert!(json["createdAt"].is_string());
}

#[tokio::test]
async fn evicted_connection_stops_receiving() {
    let mgr = ConnectionManager::new(RealtimeConfig {
        max_connections_per_user: 1,
        channel_buffer_size: 4,
    });
    let user = Uuid::new_v4();

    let (first, mut first_rx) = mgr.register(user, UserRole::Patient, "alice".into());
    let (_second, mut second_rx) = mgr.register(user, UserRole::Patient, "alice".into());

    assert!(!first.is_alive());
    assert_eq!(mgr.send_to_user(&user, &OutboundMessage::Pong), 1);

    assert!(matches!(second_rx.recv().await, Some(OutboundMessage::Pong)));
    assert!(first_rx.try_recv().is_err());
}
