//! Availability slot domain entities.

pub mod model;

pub use model::{Slot, SlotChange};
