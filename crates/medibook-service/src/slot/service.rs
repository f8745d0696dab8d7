//! Slot lifecycle: add, edit, delete, list.
//!
//! Invariants enforced here: start < end, no past dates, no overlapping
//! slots per doctor per date, no deleting a booked slot, and the
//! reschedule notification when a booked slot's timing is edited.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::info;
use uuid::Uuid;

use medibook_core::error::AppError;
use medibook_core::events::{AppointmentEvent, DomainEvent, EventPayload, EventSink};
use medibook_core::result::AppResult;
use medibook_core::types::pagination::{PageRequest, PageResponse};
use medibook_database::repositories::appointment::AppointmentRepository;
use medibook_database::repositories::slot::SlotRepository;
use medibook_entity::slot::{Slot, SlotChange};

use crate::context::RequestContext;

/// Manages doctor availability slots.
#[derive(Clone)]
pub struct SlotService {
    slot_repo: Arc<SlotRepository>,
    appointment_repo: Arc<AppointmentRepository>,
    events: Arc<dyn EventSink>,
}

impl SlotService {
    /// Creates a new slot service.
    pub fn new(
        slot_repo: Arc<SlotRepository>,
        appointment_repo: Arc<AppointmentRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            slot_repo,
            appointment_repo,
            events,
        }
    }

    /// Adds an availability slot.
    ///
    /// Doctors add their own slots; admins may add on a doctor's behalf
    /// by passing `for_doctor`.
    pub async fn add_slot(
        &self,
        ctx: &RequestContext,
        for_doctor: Option<Uuid>,
        slot_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> AppResult<Slot> {
        let doctor_id = self.resolve_doctor(ctx, for_doctor)?;
        validate_window(slot_date, start_time, end_time)?;

        if self
            .slot_repo
            .has_overlap(doctor_id, slot_date, start_time, end_time, None)
            .await?
        {
            return Err(AppError::conflict(
                "This time range overlaps an existing slot",
            ));
        }

        let slot = self
            .slot_repo
            .create(doctor_id, slot_date, start_time, end_time)
            .await?;

        info!(slot_id = %slot.id, doctor_id = %doctor_id, date = %slot_date, "Slot added");
        Ok(slot)
    }

    /// Edits a slot's date and/or time window.
    ///
    /// When the slot is booked, the booked patient is notified of the
    /// time change; the booking itself stays intact.
    pub async fn edit_slot(
        &self,
        ctx: &RequestContext,
        slot_id: Uuid,
        change: SlotChange,
    ) -> AppResult<Slot> {
        let slot = self
            .slot_repo
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| AppError::not_found("Slot not found"))?;

        self.authorize_owner(ctx, slot.doctor_id)?;

        if change.is_empty() {
            return Err(AppError::validation("No changes supplied"));
        }

        let (date, start, end) = change.resolve(&slot);
        validate_window(date, start, end)?;

        if self
            .slot_repo
            .has_overlap(slot.doctor_id, date, start, end, Some(slot_id))
            .await?
        {
            return Err(AppError::conflict(
                "This time range overlaps an existing slot",
            ));
        }

        let updated = self.slot_repo.update_timing(slot_id, date, start, end).await?;

        if updated.is_booked {
            if let Some(appointment) = self.appointment_repo.find_active_by_slot(slot_id).await? {
                self.events
                    .publish(DomainEvent::new(
                        ctx.user_id,
                        EventPayload::Appointment(AppointmentEvent::Rescheduled {
                            appointment_id: appointment.id,
                            patient_id: appointment.patient_id,
                            doctor_id: appointment.doctor_id,
                            slot_date: updated.slot_date,
                            start_time: updated.start_time,
                            end_time: updated.end_time,
                        }),
                    ))
                    .await;
            }
        }

        info!(slot_id = %slot_id, booked = updated.is_booked, "Slot edited");
        Ok(updated)
    }

    /// Deletes an unbooked slot. Booked slots cannot be deleted.
    pub async fn delete_slot(&self, ctx: &RequestContext, slot_id: Uuid) -> AppResult<()> {
        let slot = self
            .slot_repo
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| AppError::not_found("Slot not found"))?;

        self.authorize_owner(ctx, slot.doctor_id)?;

        if slot.is_booked {
            return Err(AppError::conflict("A booked slot cannot be deleted"));
        }

        // The guarded delete re-checks the booked flag; a concurrent
        // booking between the load and the delete loses nothing.
        if !self.slot_repo.delete_unbooked(slot_id).await? {
            return Err(AppError::conflict("A booked slot cannot be deleted"));
        }

        info!(slot_id = %slot_id, "Slot deleted");
        Ok(())
    }

    /// Lists a doctor's unbooked slots, ordered by date then start time.
    pub async fn list_available(
        &self,
        doctor_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        page: PageRequest,
    ) -> AppResult<PageResponse<Slot>> {
        self.slot_repo.list_available(doctor_id, from, to, &page).await
    }

    /// Lists all slots for a doctor's own management view. Admins may
    /// inspect any doctor's slots.
    pub async fn list_for_doctor(
        &self,
        ctx: &RequestContext,
        for_doctor: Option<Uuid>,
    ) -> AppResult<Vec<Slot>> {
        let doctor_id = self.resolve_doctor(ctx, for_doctor)?;
        self.slot_repo.list_for_doctor(doctor_id).await
    }

    /// Resolve which doctor an operation targets: doctors act on
    /// themselves, admins on the doctor they name.
    fn resolve_doctor(&self, ctx: &RequestContext, for_doctor: Option<Uuid>) -> AppResult<Uuid> {
        match (ctx.role.is_admin(), for_doctor) {
            (true, Some(id)) => Ok(id),
            (true, None) => Err(AppError::validation("A doctor must be specified")),
            (false, Some(id)) if ctx.is_doctor() && id == ctx.user_id => Ok(id),
            (false, None) if ctx.is_doctor() => Ok(ctx.user_id),
            _ => Err(AppError::authorization(
                "Only the owning doctor or an admin can manage slots",
            )),
        }
    }

    fn authorize_owner(&self, ctx: &RequestContext, doctor_id: Uuid) -> AppResult<()> {
        if ctx.is_admin() || (ctx.is_doctor() && ctx.user_id == doctor_id) {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Only the owning doctor or an admin can manage slots",
            ))
        }
    }
}

/// Validate a slot window: start before end, date not in the past.
fn validate_window(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> AppResult<()> {
    if start >= end {
        return Err(AppError::validation("Start time must be before end time"));
    }
    if date < Utc::now().date_naive() {
        return Err(AppError::validation("Slot date cannot be in the past"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_window_rejects_inverted_times() {
        let date = Utc::now().date_naive();
        let err = validate_window(
            date,
            "10:00:00".parse().unwrap(),
            "09:00:00".parse().unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.kind, medibook_core::ErrorKind::Validation);
    }

    #[test]
    fn test_validate_window_rejects_equal_times() {
        let date = Utc::now().date_naive();
        assert!(validate_window(
            date,
            "10:00:00".parse().unwrap(),
            "10:00:00".parse().unwrap(),
        )
        .is_err());
    }

    #[test]
    fn test_validate_window_rejects_past_dates() {
        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        let err = validate_window(
            yesterday,
            "09:00:00".parse().unwrap(),
            "10:00:00".parse().unwrap(),
        )
        .unwrap_err();
        assert_eq!(err.kind, medibook_core::ErrorKind::Validation);
    }

    #[test]
    fn test_validate_window_accepts_today() {
        let today = Utc::now().date_naive();
        assert!(validate_window(
            today,
            "09:00:00".parse().unwrap(),
            "09:30:00".parse().unwrap(),
        )
        .is_ok());
    }
}
