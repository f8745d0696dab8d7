//! Postgres-backed booking flow tests.
//!
//! These exercise the conditional slot claim, the overlap predicate, and
//! the admin status-override slot handling against real SQL. They are
//! skipped unless `DATABASE_URL` points at a disposable test database.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use medibook_core::events::NullEventSink;
use medibook_core::ErrorKind;
use medibook_database::migration;
use medibook_database::repositories::appointment::AppointmentRepository;
use medibook_database::repositories::slot::SlotRepository;
use medibook_entity::appointment::AppointmentStatus;
use medibook_entity::user::UserRole;
use medibook_service::appointment::AppointmentService;
use medibook_service::slot::SlotService;
use medibook_service::RequestContext;

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping database test");
            return None;
        }
    };
    let pool = PgPool::connect(&url)
        .await
        .expect("failed to connect to test database");
    migration::run_migrations(&pool)
        .await
        .expect("failed to run migrations");
    Some(pool)
}

async fn seed_user(pool: &PgPool, role: UserRole) -> Uuid {
    let name = format!("{}-{}", role, Uuid::new_v4().simple());
    sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash, role) \
         VALUES ($1, $2, 'not-a-real-hash', $3) RETURNING id",
    )
    .bind(&name)
    .bind(format!("{name}@medibook.test"))
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("failed to seed user")
}

fn repos(pool: &PgPool) -> (Arc<SlotRepository>, Arc<AppointmentRepository>) {
    (
        Arc::new(SlotRepository::new(pool.clone())),
        Arc::new(AppointmentRepository::new(pool.clone())),
    )
}

#[tokio::test]
async fn concurrent_bookings_on_one_slot_yield_exactly_one_winner() {
    let Some(pool) = test_pool().await else { return };
    let (slot_repo, appointment_repo) = repos(&pool);
    let service = AppointmentService::new(
        appointment_repo.clone(),
        slot_repo.clone(),
        Arc::new(NullEventSink),
    );

    let doctor = seed_user(&pool, UserRole::Doctor).await;
    let alice = seed_user(&pool, UserRole::Patient).await;
    let bob = seed_user(&pool, UserRole::Patient).await;

    let date = Utc::now().date_naive() + Duration::days(7);
    let slot = slot_repo
        .create(
            doctor,
            date,
            "09:00:00".parse().unwrap(),
            "09:30:00".parse().unwrap(),
        )
        .await
        .unwrap();

    let ctx_a = RequestContext::new(alice, UserRole::Patient, "alice".into());
    let ctx_b = RequestContext::new(bob, UserRole::Patient, "bob".into());

    let (a, b) = tokio::join!(
        service.create(&ctx_a, doctor, slot.id, None),
        service.create(&ctx_b, doctor, slot.id, None),
    );

    let winners = a.is_ok() as usize + b.is_ok() as usize;
    assert_eq!(winners, 1, "exactly one of two concurrent bookings must win");

    let loser = if a.is_ok() { b.unwrap_err() } else { a.unwrap_err() };
    assert_eq!(loser.kind, ErrorKind::Conflict);

    let active = appointment_repo.find_active_by_slot(slot.id).await.unwrap();
    assert!(active.is_some(), "the winning appointment must hold the slot");
}

#[tokio::test]
async fn overlapping_slot_for_same_doctor_conflicts() {
    let Some(pool) = test_pool().await else { return };
    let (slot_repo, appointment_repo) = repos(&pool);
    let slots = SlotService::new(slot_repo, appointment_repo, Arc::new(NullEventSink));

    let doctor = seed_user(&pool, UserRole::Doctor).await;
    let ctx = RequestContext::new(doctor, UserRole::Doctor, "drwho".into());
    let date = Utc::now().date_naive() + Duration::days(3);

    slots
        .add_slot(
            &ctx,
            None,
            date,
            "10:00:00".parse().unwrap(),
            "11:00:00".parse().unwrap(),
        )
        .await
        .unwrap();

    let err = slots
        .add_slot(
            &ctx,
            None,
            date,
            "10:30:00".parse().unwrap(),
            "11:30:00".parse().unwrap(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Touching windows are fine.
    slots
        .add_slot(
            &ctx,
            None,
            date,
            "11:00:00".parse().unwrap(),
            "12:00:00".parse().unwrap(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn forcing_a_completed_appointment_to_canceled_frees_the_slot() {
    let Some(pool) = test_pool().await else { return };
    let (slot_repo, appointment_repo) = repos(&pool);

    let doctor = seed_user(&pool, UserRole::Doctor).await;
    let patient = seed_user(&pool, UserRole::Patient).await;

    let date = Utc::now().date_naive() + Duration::days(5);
    let slot = slot_repo
        .create(
            doctor,
            date,
            "14:00:00".parse().unwrap(),
            "14:30:00".parse().unwrap(),
        )
        .await
        .unwrap();

    let appointment = appointment_repo
        .create_booked(patient, doctor, slot.id, None)
        .await
        .unwrap();
    appointment_repo.confirm(appointment.id).await.unwrap().unwrap();
    appointment_repo
        .complete(appointment.id, "seen")
        .await
        .unwrap()
        .unwrap();
    assert!(slot_repo.find_by_id(slot.id).await.unwrap().unwrap().is_booked);

    appointment_repo
        .force_status(
            appointment.id,
            AppointmentStatus::Canceled,
            Some("clerical error"),
        )
        .await
        .unwrap();
    assert!(
        !slot_repo.find_by_id(slot.id).await.unwrap().unwrap().is_booked,
        "canceling a completed appointment must free its slot"
    );

    // Forcing back out of canceled re-claims the slot.
    appointment_repo
        .force_status(appointment.id, AppointmentStatus::Completed, None)
        .await
        .unwrap();
    assert!(slot_repo.find_by_id(slot.id).await.unwrap().unwrap().is_booked);
}

#[tokio::test]
async fn patient_cannot_cancel_on_the_appointment_day() {
    let Some(pool) = test_pool().await else { return };
    let (slot_repo, appointment_repo) = repos(&pool);
    let service = AppointmentService::new(
        appointment_repo.clone(),
        slot_repo.clone(),
        Arc::new(NullEventSink),
    );

    let doctor = seed_user(&pool, UserRole::Doctor).await;
    let patient = seed_user(&pool, UserRole::Patient).await;

    // A same-day slot is still bookable.
    let today = Utc::now().date_naive();
    let slot = slot_repo
        .create(
            doctor,
            today,
            "16:00:00".parse().unwrap(),
            "16:30:00".parse().unwrap(),
        )
        .await
        .unwrap();

    let patient_ctx = RequestContext::new(patient, UserRole::Patient, "alice".into());
    let appointment = service
        .create(&patient_ctx, doctor, slot.id, None)
        .await
        .unwrap();

    let err = service
        .cancel(&patient_ctx, appointment.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    // The doctor is not bound by the window.
    let doctor_ctx = RequestContext::new(doctor, UserRole::Doctor, "drwho".into());
    service
        .cancel(&doctor_ctx, appointment.id, Some("patient no-show".into()))
        .await
        .unwrap();
    assert!(!slot_repo.find_by_id(slot.id).await.unwrap().unwrap().is_booked);
}
