//! Doctor rating domain entities.

pub mod model;

pub use model::{is_valid_rating_value, Rating, RatingEligibility, RatingView};
