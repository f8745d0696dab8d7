//! Doctor rating entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A patient's rating of a doctor. At most one per (doctor, patient) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rating {
    /// Unique rating identifier.
    pub id: Uuid,
    /// The rated doctor.
    pub doctor_id: Uuid,
    /// The rating patient.
    pub patient_id: Uuid,
    /// Rating value, 0.5–5.0 in half-star increments.
    pub rating: f64,
    /// Optional free-text feedback.
    pub feedback: Option<String>,
    /// When the rating was created.
    pub created_at: DateTime<Utc>,
    /// When the rating was last revised.
    pub updated_at: DateTime<Utc>,
}

/// A rating joined with the rater's display name, for doctor profile pages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RatingView {
    /// Unique rating identifier.
    pub id: Uuid,
    /// The rated doctor.
    pub doctor_id: Uuid,
    /// The rating patient.
    pub patient_id: Uuid,
    /// Rating value.
    pub rating: f64,
    /// Optional feedback.
    pub feedback: Option<String>,
    /// Patient display name.
    pub patient_name: String,
    /// When the rating was created.
    pub created_at: DateTime<Utc>,
}

/// Server-side answer to "may this patient rate this doctor?".
///
/// The UI gates on this, but submission re-validates: client-only checks
/// are not trustworthy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEligibility {
    /// Whether submission would currently be accepted.
    pub can_rate: bool,
    /// Number of completed appointments with the doctor.
    pub completed_appointments: i64,
    /// Whether a rating by this patient already exists.
    pub already_rated: bool,
}

/// Whether a rating value lies on the accepted half-star scale.
pub fn is_valid_rating_value(value: f64) -> bool {
    (0.5..=5.0).contains(&value) && (value * 2.0).fract() == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_star_values_accepted() {
        for v in [0.5, 1.0, 2.5, 4.5, 5.0] {
            assert!(is_valid_rating_value(v), "{v} should be valid");
        }
    }

    #[test]
    fn test_off_scale_values_rejected() {
        for v in [0.0, 0.25, 3.7, 5.5, -1.0] {
            assert!(!is_valid_rating_value(v), "{v} should be invalid");
        }
    }
}
