//! The appointment state machine and slot-booking exclusivity.
//!
//! Transition rules live in [`AppointmentStatus`]; this service wires
//! them to ownership checks, the atomic slot claim, and event fan-out.
//! Cancellation reasons are required for doctors and admins and optional
//! for patients. Patients book up to and including the slot's day and
//! may cancel only strictly before it.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::info;
use uuid::Uuid;

use medibook_core::error::AppError;
use medibook_core::events::{AppointmentEvent, DomainEvent, EventPayload, EventSink};
use medibook_core::result::AppResult;
use medibook_database::repositories::appointment::AppointmentRepository;
use medibook_database::repositories::slot::SlotRepository;
use medibook_entity::appointment::{Appointment, AppointmentStatus, AppointmentView};
use medibook_entity::slot::SlotChange;

use crate::context::RequestContext;

/// Cap for the "recent appointments" dashboard widgets.
pub const RECENT_LIMIT: i64 = 5;

/// Admin override payload: rewrite slot timing and/or force a status.
#[derive(Debug, Clone, Default)]
pub struct AdminAppointmentUpdate {
    /// New slot date.
    pub slot_date: Option<NaiveDate>,
    /// New slot start time.
    pub start_time: Option<NaiveTime>,
    /// New slot end time.
    pub end_time: Option<NaiveTime>,
    /// Forced status.
    pub status: Option<AppointmentStatus>,
    /// Cancellation reason (required when forcing `Canceled`).
    pub cancel_reason: Option<String>,
}

/// Enforces the appointment lifecycle.
#[derive(Clone)]
pub struct AppointmentService {
    appointment_repo: Arc<AppointmentRepository>,
    slot_repo: Arc<SlotRepository>,
    events: Arc<dyn EventSink>,
}

impl AppointmentService {
    /// Creates a new appointment service.
    pub fn new(
        appointment_repo: Arc<AppointmentRepository>,
        slot_repo: Arc<SlotRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            appointment_repo,
            slot_repo,
            events,
        }
    }

    /// Books an available slot for the calling patient.
    ///
    /// The slot claim is atomic: of two concurrent bookings on the same
    /// slot, exactly one succeeds and the other receives a conflict.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        doctor_id: Uuid,
        slot_id: Uuid,
        notes: Option<String>,
    ) -> AppResult<Appointment> {
        if !ctx.is_patient() {
            return Err(AppError::authorization("Only patients can book appointments"));
        }

        let slot = self
            .slot_repo
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| AppError::not_found("Slot not found"))?;

        if slot.doctor_id != doctor_id {
            return Err(AppError::validation(
                "The slot does not belong to the selected doctor",
            ));
        }

        if !bookable_on(slot.slot_date, Utc::now().date_naive()) {
            return Err(AppError::validation("This slot's date has already passed"));
        }

        let appointment = self
            .appointment_repo
            .create_booked(ctx.user_id, doctor_id, slot_id, notes.as_deref())
            .await?;

        info!(
            appointment_id = %appointment.id,
            patient_id = %ctx.user_id,
            doctor_id = %doctor_id,
            slot_id = %slot_id,
            "Appointment booked"
        );

        self.events
            .publish(DomainEvent::new(
                ctx.user_id,
                EventPayload::Appointment(AppointmentEvent::Booked {
                    appointment_id: appointment.id,
                    doctor_id,
                    patient_id: ctx.user_id,
                    slot_id,
                    slot_date: slot.slot_date,
                    start_time: slot.start_time,
                }),
            ))
            .await;

        Ok(appointment)
    }

    /// Doctor confirms a pending appointment.
    pub async fn confirm(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Appointment> {
        let current = self.load_for_doctor(ctx, id).await?;

        if !current.status.can_transition_to(AppointmentStatus::Confirmed) {
            return Err(invalid_transition(
                current.status,
                AppointmentStatus::Confirmed,
            ));
        }

        let confirmed = self
            .appointment_repo
            .confirm(id)
            .await?
            .ok_or_else(|| invalid_transition(current.status, AppointmentStatus::Confirmed))?;

        let slot = self.slot_repo.find_by_id(confirmed.slot_id).await?;

        self.events
            .publish(DomainEvent::new(
                ctx.user_id,
                EventPayload::Appointment(AppointmentEvent::Confirmed {
                    appointment_id: confirmed.id,
                    patient_id: confirmed.patient_id,
                    doctor_id: confirmed.doctor_id,
                    slot_date: slot.map(|s| s.slot_date).unwrap_or_default(),
                }),
            ))
            .await;

        Ok(confirmed)
    }

    /// Doctor completes a confirmed appointment with a comment. The slot
    /// remains historically consumed.
    pub async fn complete(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        doctor_comment: String,
    ) -> AppResult<Appointment> {
        let current = self.load_for_doctor(ctx, id).await?;

        if !current.status.can_transition_to(AppointmentStatus::Completed) {
            return Err(invalid_transition(
                current.status,
                AppointmentStatus::Completed,
            ));
        }

        let completed = self
            .appointment_repo
            .complete(id, &doctor_comment)
            .await?
            .ok_or_else(|| invalid_transition(current.status, AppointmentStatus::Completed))?;

        self.events
            .publish(DomainEvent::new(
                ctx.user_id,
                EventPayload::Appointment(AppointmentEvent::Completed {
                    appointment_id: completed.id,
                    patient_id: completed.patient_id,
                    doctor_id: completed.doctor_id,
                }),
            ))
            .await;

        Ok(completed)
    }

    /// Cancels an active appointment and frees its slot.
    ///
    /// A reason is required when the canceling actor is a doctor or an
    /// admin; patients may omit it but can only cancel before the slot's
    /// date. The non-canceling party is notified.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        reason: Option<String>,
    ) -> AppResult<Appointment> {
        let current = self
            .appointment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment not found"))?;

        let is_patient_party = ctx.is_patient() && ctx.user_id == current.patient_id;
        let is_doctor_party = ctx.is_doctor() && ctx.user_id == current.doctor_id;

        if !(is_patient_party || is_doctor_party || ctx.is_admin()) {
            return Err(AppError::authorization(
                "You are not a party to this appointment",
            ));
        }

        if !is_patient_party && reason.as_deref().map_or(true, |r| r.trim().is_empty()) {
            return Err(AppError::validation("A cancellation reason is required"));
        }

        if !current.status.can_transition_to(AppointmentStatus::Canceled) {
            return Err(invalid_transition(
                current.status,
                AppointmentStatus::Canceled,
            ));
        }

        if is_patient_party {
            if let Some(slot) = self.slot_repo.find_by_id(current.slot_id).await? {
                if !patient_may_cancel_on(slot.slot_date, Utc::now().date_naive()) {
                    return Err(AppError::invalid_state(
                        "Appointments can no longer be canceled on or after their date",
                    ));
                }
            }
        }

        let canceled = self
            .appointment_repo
            .cancel(id, reason.as_deref())
            .await?
            .ok_or_else(|| invalid_transition(current.status, AppointmentStatus::Canceled))?;

        info!(appointment_id = %id, by = %ctx.role, "Appointment canceled");

        self.events
            .publish(DomainEvent::new(
                ctx.user_id,
                EventPayload::Appointment(AppointmentEvent::Canceled {
                    appointment_id: canceled.id,
                    doctor_id: canceled.doctor_id,
                    patient_id: canceled.patient_id,
                    canceled_by_patient: is_patient_party,
                    reason: canceled.cancel_reason.clone(),
                }),
            ))
            .await;

        Ok(canceled)
    }

    /// Doctor revises the comment on a completed appointment.
    pub async fn update_comment(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        doctor_comment: String,
    ) -> AppResult<Appointment> {
        let current = self.load_for_doctor(ctx, id).await?;

        self.appointment_repo
            .update_comment(id, &doctor_comment)
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!(
                    "Comments can only be revised on completed appointments (current status: {})",
                    current.status
                ))
            })
    }

    /// Admin override: rewrite slot timing and/or force a status change,
    /// bypassing the normal transition guards. The slot-booked invariant
    /// is preserved and notifications equivalent to the corresponding
    /// engine operation are emitted.
    pub async fn admin_update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        update: AdminAppointmentUpdate,
    ) -> AppResult<Appointment> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }

        let mut current = self
            .appointment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment not found"))?;

        let timing = SlotChange {
            slot_date: update.slot_date,
            start_time: update.start_time,
            end_time: update.end_time,
        };

        if !timing.is_empty() {
            let slot = self
                .slot_repo
                .find_by_id(current.slot_id)
                .await?
                .ok_or_else(|| AppError::not_found("Slot not found"))?;

            let (date, start, end) = timing.resolve(&slot);
            if start >= end {
                return Err(AppError::validation("Start time must be before end time"));
            }
            if self
                .slot_repo
                .has_overlap(slot.doctor_id, date, start, end, Some(slot.id))
                .await?
            {
                return Err(AppError::conflict(
                    "This time range overlaps an existing slot",
                ));
            }

            let updated_slot = self.slot_repo.update_timing(slot.id, date, start, end).await?;

            if current.status.holds_slot() {
                self.events
                    .publish(DomainEvent::new(
                        ctx.user_id,
                        EventPayload::Appointment(AppointmentEvent::Rescheduled {
                            appointment_id: current.id,
                            patient_id: current.patient_id,
                            doctor_id: current.doctor_id,
                            slot_date: updated_slot.slot_date,
                            start_time: updated_slot.start_time,
                            end_time: updated_slot.end_time,
                        }),
                    ))
                    .await;
            }
        }

        if let Some(status) = update.status {
            if status == AppointmentStatus::Canceled
                && update.cancel_reason.as_deref().map_or(true, |r| r.trim().is_empty())
            {
                return Err(AppError::validation("A cancellation reason is required"));
            }

            if status != current.status {
                current = self
                    .appointment_repo
                    .force_status(id, status, update.cancel_reason.as_deref())
                    .await?;

                info!(appointment_id = %id, status = %status, "Status forced by admin");
                self.publish_forced_status(ctx, &current, status).await;
            }
        } else if !timing.is_empty() {
            current = self
                .appointment_repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found("Appointment not found"))?;
        }

        Ok(current)
    }

    /// Admin hard-delete; frees the slot if this appointment held it.
    pub async fn admin_delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }

        let deleted = self
            .appointment_repo
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment not found"))?;

        info!(appointment_id = %id, "Appointment deleted by admin");

        self.events
            .publish(DomainEvent::new(
                ctx.user_id,
                EventPayload::Appointment(AppointmentEvent::Deleted {
                    appointment_id: deleted.id,
                    doctor_id: deleted.doctor_id,
                    patient_id: deleted.patient_id,
                }),
            ))
            .await;

        Ok(())
    }

    /// The calling patient's appointments, most recent slot first.
    pub async fn list_for_patient(&self, ctx: &RequestContext) -> AppResult<Vec<AppointmentView>> {
        self.appointment_repo.list_for_patient(ctx.user_id).await
    }

    /// The calling doctor's appointments, most recent slot first.
    pub async fn list_for_doctor(&self, ctx: &RequestContext) -> AppResult<Vec<AppointmentView>> {
        if !ctx.is_doctor() {
            return Err(AppError::authorization("Doctor access required"));
        }
        self.appointment_repo.list_for_doctor(ctx.user_id).await
    }

    /// The calling doctor's most recent appointments, capped at
    /// [`RECENT_LIMIT`].
    pub async fn recent_for_doctor(&self, ctx: &RequestContext) -> AppResult<Vec<AppointmentView>> {
        if !ctx.is_doctor() {
            return Err(AppError::authorization("Doctor access required"));
        }
        self.appointment_repo
            .recent_for_doctor(ctx.user_id, RECENT_LIMIT)
            .await
    }

    /// All appointments (admin).
    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<AppointmentView>> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }
        self.appointment_repo.list_all().await
    }

    /// The most recent appointments across all doctors, capped (admin).
    pub async fn recent_all(&self, ctx: &RequestContext) -> AppResult<Vec<AppointmentView>> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }
        self.appointment_repo.recent_all(RECENT_LIMIT).await
    }

    /// Load an appointment and check the caller is its doctor (or admin).
    async fn load_for_doctor(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Appointment> {
        let appointment = self
            .appointment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Appointment not found"))?;

        if ctx.is_admin() || (ctx.is_doctor() && ctx.user_id == appointment.doctor_id) {
            Ok(appointment)
        } else {
            Err(AppError::authorization(
                "Only the appointment's doctor can do this",
            ))
        }
    }

    async fn publish_forced_status(
        &self,
        ctx: &RequestContext,
        appointment: &Appointment,
        status: AppointmentStatus,
    ) {
        let event = match status {
            AppointmentStatus::Confirmed => {
                let slot = self.slot_repo.find_by_id(appointment.slot_id).await.ok().flatten();
                Some(AppointmentEvent::Confirmed {
                    appointment_id: appointment.id,
                    patient_id: appointment.patient_id,
                    doctor_id: appointment.doctor_id,
                    slot_date: slot.map(|s| s.slot_date).unwrap_or_default(),
                })
            }
            AppointmentStatus::Completed => Some(AppointmentEvent::Completed {
                appointment_id: appointment.id,
                patient_id: appointment.patient_id,
                doctor_id: appointment.doctor_id,
            }),
            AppointmentStatus::Canceled => Some(AppointmentEvent::Canceled {
                appointment_id: appointment.id,
                doctor_id: appointment.doctor_id,
                patient_id: appointment.patient_id,
                canceled_by_patient: false,
                reason: appointment.cancel_reason.clone(),
            }),
            AppointmentStatus::Pending => None,
        };

        if let Some(event) = event {
            self.events
                .publish(DomainEvent::new(ctx.user_id, EventPayload::Appointment(event)))
                .await;
        }
    }
}

fn invalid_transition(from: AppointmentStatus, to: AppointmentStatus) -> AppError {
    AppError::invalid_state(format!(
        "Cannot move a {from} appointment to {to}"
    ))
}

/// A slot can be booked up to and including its calendar day.
fn bookable_on(slot_date: NaiveDate, today: NaiveDate) -> bool {
    slot_date >= today
}

/// Patients may cancel only strictly before the slot's calendar day;
/// doctors and admins are not bound by this window.
fn patient_may_cancel_on(slot_date: NaiveDate, today: NaiveDate) -> bool {
    today < slot_date
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = invalid_transition(AppointmentStatus::Completed, AppointmentStatus::Confirmed);
        assert_eq!(err.kind, medibook_core::ErrorKind::InvalidState);
        assert!(err.message.contains("completed"));
        assert!(err.message.contains("confirmed"));
    }

    #[test]
    fn test_recent_limit_is_five() {
        assert_eq!(RECENT_LIMIT, 5);
    }

    #[test]
    fn test_slots_bookable_through_their_own_day() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap();
        assert!(bookable_on(date, date.pred_opt().unwrap()));
        assert!(bookable_on(date, date));
        assert!(!bookable_on(date, date.succ_opt().unwrap()));
    }

    #[test]
    fn test_patient_cancel_window_closes_on_the_slot_date() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap();
        assert!(patient_may_cancel_on(date, date.pred_opt().unwrap()));
        assert!(!patient_may_cancel_on(date, date));
        assert!(!patient_may_cancel_on(date, date.succ_opt().unwrap()));
    }
}
