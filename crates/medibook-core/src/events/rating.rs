//! Rating-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to doctor ratings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RatingEvent {
    /// A patient submitted a new rating.
    Submitted {
        /// The new rating ID.
        rating_id: Uuid,
        /// The rated doctor.
        doctor_id: Uuid,
        /// The rating patient.
        patient_id: Uuid,
        /// The rating value (0.5–5.0).
        rating: f64,
    },
    /// A patient revised their existing rating.
    Updated {
        /// The rating ID.
        rating_id: Uuid,
        /// The rated doctor.
        doctor_id: Uuid,
        /// The rating patient.
        patient_id: Uuid,
        /// The new rating value.
        rating: f64,
    },
    /// An admin removed a rating.
    Removed {
        /// The removed rating ID.
        rating_id: Uuid,
        /// The doctor whose average must be recomputed.
        doctor_id: Uuid,
    },
}
