//! Doctor ratings: eligibility, submission, revision, removal.
//!
//! Eligibility is checked server-side on every write. After any change
//! the doctor's denormalized average and count are recomputed from the
//! rating rows, so they never drift.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use medibook_core::error::AppError;
use medibook_core::events::{DomainEvent, EventPayload, EventSink, RatingEvent};
use medibook_core::result::AppResult;
use medibook_database::repositories::appointment::AppointmentRepository;
use medibook_database::repositories::rating::RatingRepository;
use medibook_database::repositories::user::UserRepository;
use medibook_entity::rating::{is_valid_rating_value, Rating, RatingEligibility, RatingView};

use crate::context::RequestContext;

/// Manages patient ratings of doctors.
#[derive(Clone)]
pub struct RatingService {
    rating_repo: Arc<RatingRepository>,
    appointment_repo: Arc<AppointmentRepository>,
    user_repo: Arc<UserRepository>,
    events: Arc<dyn EventSink>,
}

impl RatingService {
    /// Creates a new rating service.
    pub fn new(
        rating_repo: Arc<RatingRepository>,
        appointment_repo: Arc<AppointmentRepository>,
        user_repo: Arc<UserRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            rating_repo,
            appointment_repo,
            user_repo,
            events,
        }
    }

    /// Answers "may this patient rate this doctor right now?".
    pub async fn eligibility(
        &self,
        ctx: &RequestContext,
        doctor_id: Uuid,
    ) -> AppResult<RatingEligibility> {
        let completed = self
            .appointment_repo
            .count_completed(ctx.user_id, doctor_id)
            .await?;
        let already_rated = self
            .rating_repo
            .find_by_pair(doctor_id, ctx.user_id)
            .await?
            .is_some();

        Ok(RatingEligibility {
            can_rate: ctx.is_patient() && completed > 0 && !already_rated,
            completed_appointments: completed,
            already_rated,
        })
    }

    /// Submits a new rating for a doctor.
    ///
    /// Requires at least one completed appointment between the pair, and
    /// at most one rating per pair exists.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        doctor_id: Uuid,
        rating: f64,
        feedback: Option<String>,
    ) -> AppResult<Rating> {
        self.check_patient(ctx)?;
        check_value(rating)?;
        self.check_doctor(doctor_id).await?;

        let completed = self
            .appointment_repo
            .count_completed(ctx.user_id, doctor_id)
            .await?;
        if completed == 0 {
            return Err(AppError::eligibility(
                "You can only rate a doctor after a completed appointment",
            ));
        }

        // The unique (doctor, patient) constraint backstops this check
        // under concurrency.
        let created = self
            .rating_repo
            .create(doctor_id, ctx.user_id, rating, feedback.as_deref())
            .await?;

        self.rating_repo.recompute_doctor_average(doctor_id).await?;

        info!(rating_id = %created.id, doctor_id = %doctor_id, rating, "Rating submitted");

        self.events
            .publish(DomainEvent::new(
                ctx.user_id,
                EventPayload::Rating(RatingEvent::Submitted {
                    rating_id: created.id,
                    doctor_id,
                    patient_id: ctx.user_id,
                    rating,
                }),
            ))
            .await;

        Ok(created)
    }

    /// Revises the caller's existing rating of a doctor.
    pub async fn revise(
        &self,
        ctx: &RequestContext,
        doctor_id: Uuid,
        rating: f64,
        feedback: Option<String>,
    ) -> AppResult<Rating> {
        self.check_patient(ctx)?;
        check_value(rating)?;

        let updated = self
            .rating_repo
            .update(doctor_id, ctx.user_id, rating, feedback.as_deref())
            .await?
            .ok_or_else(|| AppError::not_found("You have not rated this doctor yet"))?;

        self.rating_repo.recompute_doctor_average(doctor_id).await?;

        self.events
            .publish(DomainEvent::new(
                ctx.user_id,
                EventPayload::Rating(RatingEvent::Updated {
                    rating_id: updated.id,
                    doctor_id,
                    patient_id: ctx.user_id,
                    rating,
                }),
            ))
            .await;

        Ok(updated)
    }

    /// Removes a rating (admin) and recomputes the doctor's average.
    pub async fn remove(&self, ctx: &RequestContext, rating_id: Uuid) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }

        let removed = self
            .rating_repo
            .delete(rating_id)
            .await?
            .ok_or_else(|| AppError::not_found("Rating not found"))?;

        self.rating_repo
            .recompute_doctor_average(removed.doctor_id)
            .await?;

        info!(rating_id = %rating_id, doctor_id = %removed.doctor_id, "Rating removed");

        self.events
            .publish(DomainEvent::new(
                ctx.user_id,
                EventPayload::Rating(RatingEvent::Removed {
                    rating_id: removed.id,
                    doctor_id: removed.doctor_id,
                }),
            ))
            .await;

        Ok(())
    }

    /// Lists a doctor's ratings with rater names, newest first.
    pub async fn list_for_doctor(&self, doctor_id: Uuid) -> AppResult<Vec<RatingView>> {
        self.rating_repo.list_for_doctor(doctor_id).await
    }

    fn check_patient(&self, ctx: &RequestContext) -> AppResult<()> {
        if ctx.is_patient() {
            Ok(())
        } else {
            Err(AppError::authorization("Only patients can rate doctors"))
        }
    }

    async fn check_doctor(&self, doctor_id: Uuid) -> AppResult<()> {
        let user = self
            .user_repo
            .find_by_id(doctor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Doctor not found"))?;
        if user.role.is_doctor() {
            Ok(())
        } else {
            Err(AppError::validation("The rated user is not a doctor"))
        }
    }
}

fn check_value(rating: f64) -> AppResult<()> {
    if is_valid_rating_value(rating) {
        Ok(())
    } else {
        Err(AppError::validation(
            "Rating must be between 0.5 and 5.0 in half-star steps",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value_bounds() {
        assert!(check_value(0.5).is_ok());
        assert!(check_value(5.0).is_ok());
        assert!(check_value(3.5).is_ok());
        assert_eq!(
            check_value(0.0).unwrap_err().kind,
            medibook_core::ErrorKind::Validation
        );
        assert!(check_value(3.25).is_err());
    }
}
