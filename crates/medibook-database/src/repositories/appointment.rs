//! Appointment repository implementation.
//!
//! Booking exclusivity lives here: claiming a slot is a single conditional
//! `UPDATE … WHERE NOT is_booked` inside the same transaction as the
//! appointment insert, so two concurrent bookings of one slot yield
//! exactly one success. A partial unique index on active appointments
//! backs the same invariant at the schema level.

use sqlx::PgPool;
use uuid::Uuid;

use medibook_core::error::{AppError, ErrorKind};
use medibook_core::result::AppResult;
use medibook_entity::appointment::{Appointment, AppointmentStatus, AppointmentView};

/// Columns selected for the joined appointment list views.
const VIEW_SELECT: &str = "SELECT a.id, a.doctor_id, a.patient_id, a.slot_id, a.status, a.notes, \
                           a.doctor_comment, a.cancel_reason, s.slot_date, s.start_time, s.end_time, \
                           COALESCE(d.display_name, d.username) AS doctor_name, \
                           COALESCE(p.display_name, p.username) AS patient_name, a.created_at \
                           FROM appointments a \
                           JOIN slots s ON s.id = a.slot_id \
                           JOIN users d ON d.id = a.doctor_id \
                           JOIN users p ON p.id = a.patient_id";

/// Repository for appointments and their slot-claim lifecycle.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    /// Create a new appointment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an appointment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find appointment", e)
            })
    }

    /// Find the active (pending or confirmed) appointment on a slot.
    pub async fn find_active_by_slot(&self, slot_id: Uuid) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE slot_id = $1 AND status IN ('pending', 'confirmed')",
        )
        .bind(slot_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find appointment", e))
    }

    /// Atomically claim a slot and create a pending appointment.
    ///
    /// Returns a conflict error when the slot is already booked; exactly
    /// one of N concurrent calls on the same slot succeeds.
    pub async fn create_booked(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        slot_id: Uuid,
        notes: Option<&str>,
    ) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let claimed = sqlx::query("UPDATE slots SET is_booked = TRUE WHERE id = $1 AND NOT is_booked")
            .bind(slot_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim slot", e))?;

        if claimed.rows_affected() == 0 {
            return Err(AppError::conflict("This slot is already booked"));
        }

        let appointment = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (doctor_id, patient_id, slot_id, status, notes) \
             VALUES ($1, $2, $3, 'pending', $4) RETURNING *",
        )
        .bind(doctor_id)
        .bind(patient_id)
        .bind(slot_id)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create appointment", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit booking", e)
        })?;

        Ok(appointment)
    }

    /// Guarded `Pending → Confirmed` transition. Returns `None` when the
    /// appointment was not pending at update time.
    pub async fn confirm(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'confirmed', updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to confirm appointment", e)
        })
    }

    /// Guarded `Confirmed → Completed` transition. The slot stays booked.
    pub async fn complete(&self, id: Uuid, doctor_comment: &str) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'completed', doctor_comment = $2, updated_at = NOW() \
             WHERE id = $1 AND status = 'confirmed' RETURNING *",
        )
        .bind(id)
        .bind(doctor_comment)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to complete appointment", e)
        })
    }

    /// Guarded `{Pending,Confirmed} → Canceled` transition; frees the slot
    /// in the same transaction. Returns `None` when the appointment was
    /// already terminal.
    pub async fn cancel(&self, id: Uuid, reason: Option<&str>) -> AppResult<Option<Appointment>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let appointment = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'canceled', cancel_reason = $2, updated_at = NOW() \
             WHERE id = $1 AND status IN ('pending', 'confirmed') RETURNING *",
        )
        .bind(id)
        .bind(reason)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to cancel appointment", e)
        })?;

        let Some(appointment) = appointment else {
            return Ok(None);
        };

        sqlx::query("UPDATE slots SET is_booked = FALSE WHERE id = $1")
            .bind(appointment.slot_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release slot", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit cancellation", e)
        })?;

        Ok(Some(appointment))
    }

    /// Revise the doctor comment on a completed appointment.
    pub async fn update_comment(
        &self,
        id: Uuid,
        doctor_comment: &str,
    ) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET doctor_comment = $2, updated_at = NOW() \
             WHERE id = $1 AND status = 'completed' RETURNING *",
        )
        .bind(id)
        .bind(doctor_comment)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update comment", e))
    }

    /// Admin override: force a status, preserving the slot-booked
    /// invariant. The slot row stays booked for every status except
    /// `Canceled` (`Completed` keeps it historically consumed), so
    /// forcing into `Canceled` from any other status frees the slot, and
    /// forcing a canceled appointment to any other status re-claims it,
    /// conflicting when the slot has been taken by someone else meanwhile.
    pub async fn force_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        cancel_reason: Option<&str>,
    ) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let current = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load appointment", e))?
        .ok_or_else(|| AppError::not_found("Appointment not found"))?;

        match forced_slot_action(current.status, status) {
            SlotAction::Release => {
                sqlx::query("UPDATE slots SET is_booked = FALSE WHERE id = $1")
                    .bind(current.slot_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to release slot", e)
                    })?;
            }
            SlotAction::Claim => {
                let claimed =
                    sqlx::query("UPDATE slots SET is_booked = TRUE WHERE id = $1 AND NOT is_booked")
                        .bind(current.slot_id)
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            AppError::with_source(ErrorKind::Database, "Failed to claim slot", e)
                        })?;
                if claimed.rows_affected() == 0 {
                    return Err(AppError::conflict(
                        "The slot has been booked by another appointment",
                    ));
                }
            }
            SlotAction::None => {}
        }

        let updated = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $2, cancel_reason = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(cancel_reason.or(current.cancel_reason.as_deref()))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to force status", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit status override", e)
        })?;

        Ok(updated)
    }

    /// Hard-delete an appointment (admin); frees the slot when this
    /// appointment was the one keeping it booked.
    pub async fn delete(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let deleted = sqlx::query_as::<_, Appointment>(
            "DELETE FROM appointments WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete appointment", e)
        })?;

        let Some(deleted) = deleted else {
            return Ok(None);
        };

        if deleted.status != AppointmentStatus::Canceled {
            sqlx::query("UPDATE slots SET is_booked = FALSE WHERE id = $1")
                .bind(deleted.slot_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to release slot", e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit deletion", e)
        })?;

        Ok(Some(deleted))
    }

    /// A patient's appointments, most recent slot first.
    pub async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<AppointmentView>> {
        sqlx::query_as::<_, AppointmentView>(&format!(
            "{VIEW_SELECT} WHERE a.patient_id = $1 ORDER BY s.slot_date DESC, s.start_time DESC"
        ))
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list appointments", e))
    }

    /// A doctor's appointments, most recent slot first.
    pub async fn list_for_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<AppointmentView>> {
        sqlx::query_as::<_, AppointmentView>(&format!(
            "{VIEW_SELECT} WHERE a.doctor_id = $1 ORDER BY s.slot_date DESC, s.start_time DESC"
        ))
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list appointments", e))
    }

    /// All appointments (admin), most recent slot first.
    pub async fn list_all(&self) -> AppResult<Vec<AppointmentView>> {
        sqlx::query_as::<_, AppointmentView>(&format!(
            "{VIEW_SELECT} ORDER BY s.slot_date DESC, s.start_time DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list appointments", e))
    }

    /// A doctor's most recent appointments, capped.
    pub async fn recent_for_doctor(
        &self,
        doctor_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<AppointmentView>> {
        sqlx::query_as::<_, AppointmentView>(&format!(
            "{VIEW_SELECT} WHERE a.doctor_id = $1 \
             ORDER BY s.slot_date DESC, s.start_time DESC LIMIT $2"
        ))
        .bind(doctor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list appointments", e))
    }

    /// The most recent appointments across all doctors, capped (admin).
    pub async fn recent_all(&self, limit: i64) -> AppResult<Vec<AppointmentView>> {
        sqlx::query_as::<_, AppointmentView>(&format!(
            "{VIEW_SELECT} ORDER BY s.slot_date DESC, s.start_time DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list appointments", e))
    }

    /// Count completed appointments between a patient and a doctor
    /// (rating eligibility).
    pub async fn count_completed(&self, patient_id: Uuid, doctor_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments \
             WHERE patient_id = $1 AND doctor_id = $2 AND status = 'completed'",
        )
        .bind(patient_id)
        .bind(doctor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count completed", e))
    }

    /// Count appointments with the given status (admin stats).
    pub async fn count_by_status(&self, status: AppointmentStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count appointments", e)
            })
    }
}

/// Slot side-effect of forcing an appointment from one status to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotAction {
    /// Free the slot.
    Release,
    /// Conditionally re-claim the slot; conflicts when already taken.
    Claim,
    /// Leave the slot untouched.
    None,
}

/// The slot row is booked for every status except `Canceled`, so the
/// action depends only on whether the override crosses that line.
fn forced_slot_action(from: AppointmentStatus, to: AppointmentStatus) -> SlotAction {
    let booked_before = from != AppointmentStatus::Canceled;
    let booked_after = to != AppointmentStatus::Canceled;
    match (booked_before, booked_after) {
        (true, false) => SlotAction::Release,
        (false, true) => SlotAction::Claim,
        _ => SlotAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use AppointmentStatus::*;

    #[test]
    fn test_forcing_into_canceled_always_frees_the_slot() {
        assert_eq!(forced_slot_action(Pending, Canceled), SlotAction::Release);
        assert_eq!(forced_slot_action(Confirmed, Canceled), SlotAction::Release);
        assert_eq!(forced_slot_action(Completed, Canceled), SlotAction::Release);
    }

    #[test]
    fn test_forcing_out_of_canceled_reclaims_the_slot() {
        assert_eq!(forced_slot_action(Canceled, Pending), SlotAction::Claim);
        assert_eq!(forced_slot_action(Canceled, Confirmed), SlotAction::Claim);
        assert_eq!(forced_slot_action(Canceled, Completed), SlotAction::Claim);
    }

    #[test]
    fn test_forcing_between_booked_statuses_leaves_the_slot_alone() {
        assert_eq!(forced_slot_action(Pending, Confirmed), SlotAction::None);
        assert_eq!(forced_slot_action(Confirmed, Completed), SlotAction::None);
        assert_eq!(forced_slot_action(Completed, Confirmed), SlotAction::None);
        assert_eq!(forced_slot_action(Canceled, Canceled), SlotAction::None);
    }
}
