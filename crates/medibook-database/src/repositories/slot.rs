//! Slot repository implementation.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use medibook_core::error::{AppError, ErrorKind};
use medibook_core::result::AppResult;
use medibook_core::types::pagination::{PageRequest, PageResponse};
use medibook_entity::slot::Slot;

/// Repository for doctor availability slots.
#[derive(Debug, Clone)]
pub struct SlotRepository {
    pool: PgPool,
}

impl SlotRepository {
    /// Create a new slot repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a slot by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Slot>> {
        sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find slot", e))
    }

    /// Insert a new slot.
    pub async fn create(
        &self,
        doctor_id: Uuid,
        slot_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> AppResult<Slot> {
        sqlx::query_as::<_, Slot>(
            "INSERT INTO slots (doctor_id, slot_date, start_time, end_time) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(doctor_id)
        .bind(slot_date)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create slot", e))
    }

    /// Rewrite a slot's date and time window.
    pub async fn update_timing(
        &self,
        id: Uuid,
        slot_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> AppResult<Slot> {
        sqlx::query_as::<_, Slot>(
            "UPDATE slots SET slot_date = $2, start_time = $3, end_time = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(slot_date)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update slot", e))
    }

    /// Delete an unbooked slot. Returns false when the row was not
    /// deleted because the slot is booked or absent.
    pub async fn delete_unbooked(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM slots WHERE id = $1 AND NOT is_booked")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete slot", e))?;
        Ok(result.rows_affected() == 1)
    }

    /// Check whether a time range overlaps any existing slot for the same
    /// doctor and date, optionally excluding one slot (for edits).
    pub async fn has_overlap(
        &self,
        doctor_id: Uuid,
        slot_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_slot: Option<Uuid>,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM slots \
             WHERE doctor_id = $1 AND slot_date = $2 \
               AND start_time < $4 AND $3 < end_time \
               AND ($5::uuid IS NULL OR id <> $5)",
        )
        .bind(doctor_id)
        .bind(slot_date)
        .bind(start_time)
        .bind(end_time)
        .bind(exclude_slot)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check overlap", e))?;

        Ok(count > 0)
    }

    /// List unbooked slots for a doctor, ordered by date then start time.
    ///
    /// The ordering is stable, so the same page request always restarts
    /// the sequence at the same point.
    pub async fn list_available(
        &self,
        doctor_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Slot>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM slots \
             WHERE doctor_id = $1 AND NOT is_booked \
               AND ($2::date IS NULL OR slot_date >= $2) \
               AND ($3::date IS NULL OR slot_date <= $3)",
        )
        .bind(doctor_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count slots", e))?;

        let slots = sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots \
             WHERE doctor_id = $1 AND NOT is_booked \
               AND ($2::date IS NULL OR slot_date >= $2) \
               AND ($3::date IS NULL OR slot_date <= $3) \
             ORDER BY slot_date, start_time LIMIT $4 OFFSET $5",
        )
        .bind(doctor_id)
        .bind(from)
        .bind(to)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list slots", e))?;

        Ok(PageResponse::new(slots, page.page, page.page_size, total as u64))
    }

    /// List all slots for a doctor (their own management view).
    pub async fn list_for_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<Slot>> {
        sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE doctor_id = $1 ORDER BY slot_date, start_time",
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list slots", e))
    }

    /// Mark a slot free again (cancellation path).
    pub async fn release(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE slots SET is_booked = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release slot", e))?;
        Ok(())
    }
}
