//! Rating repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use medibook_core::error::{AppError, ErrorKind};
use medibook_core::result::AppResult;
use medibook_entity::rating::{Rating, RatingView};

/// Repository for doctor ratings and the denormalized averages.
#[derive(Debug, Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    /// Create a new rating repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a rating by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rating>> {
        sqlx::query_as::<_, Rating>("SELECT * FROM ratings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find rating", e))
    }

    /// Find the rating a patient gave a doctor, if any.
    pub async fn find_by_pair(&self, doctor_id: Uuid, patient_id: Uuid) -> AppResult<Option<Rating>> {
        sqlx::query_as::<_, Rating>(
            "SELECT * FROM ratings WHERE doctor_id = $1 AND patient_id = $2",
        )
        .bind(doctor_id)
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find rating", e))
    }

    /// Insert a new rating. The unique (doctor, patient) constraint maps
    /// to an eligibility error: one rating per pair.
    pub async fn create(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        rating: f64,
        feedback: Option<&str>,
    ) -> AppResult<Rating> {
        sqlx::query_as::<_, Rating>(
            "INSERT INTO ratings (doctor_id, patient_id, rating, feedback) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(doctor_id)
        .bind(patient_id)
        .bind(rating)
        .bind(feedback)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::eligibility("You have already rated this doctor")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create rating", e),
        })
    }

    /// Revise a patient's existing rating of a doctor.
    pub async fn update(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        rating: f64,
        feedback: Option<&str>,
    ) -> AppResult<Option<Rating>> {
        sqlx::query_as::<_, Rating>(
            "UPDATE ratings SET rating = $3, feedback = $4, updated_at = NOW() \
             WHERE doctor_id = $1 AND patient_id = $2 RETURNING *",
        )
        .bind(doctor_id)
        .bind(patient_id)
        .bind(rating)
        .bind(feedback)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update rating", e))
    }

    /// Delete a rating (admin). Returns the removed row for event fan-out.
    pub async fn delete(&self, id: Uuid) -> AppResult<Option<Rating>> {
        sqlx::query_as::<_, Rating>("DELETE FROM ratings WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete rating", e))
    }

    /// List a doctor's ratings with rater display names, newest first.
    pub async fn list_for_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<RatingView>> {
        sqlx::query_as::<_, RatingView>(
            "SELECT r.id, r.doctor_id, r.patient_id, r.rating, r.feedback, \
                    COALESCE(p.display_name, p.username) AS patient_name, r.created_at \
             FROM ratings r JOIN users p ON p.id = r.patient_id \
             WHERE r.doctor_id = $1 ORDER BY r.created_at DESC",
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list ratings", e))
    }

    /// Recompute and store a doctor's average rating and rating count.
    ///
    /// Called after every submit, revise, and delete so the denormalized
    /// columns never drift from the rating rows.
    pub async fn recompute_doctor_average(&self, doctor_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET \
                rating_avg = (SELECT AVG(rating) FROM ratings WHERE doctor_id = $1), \
                rating_count = (SELECT COUNT(*) FROM ratings WHERE doctor_id = $1), \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(doctor_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to recompute average", e)
        })?;
        Ok(())
    }
}
