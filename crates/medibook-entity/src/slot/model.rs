//! Availability slot entity model.
//!
//! All dates and times are canonical ISO-8601 values (`NaiveDate` /
//! `NaiveTime`); the wire format is `YYYY-MM-DD` and `HH:MM:SS`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A doctor-defined bookable time window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Slot {
    /// Unique slot identifier.
    pub id: Uuid,
    /// The doctor who owns this slot.
    pub doctor_id: Uuid,
    /// Calendar day of the slot.
    pub slot_date: NaiveDate,
    /// Start of the window.
    pub start_time: NaiveTime,
    /// End of the window.
    pub end_time: NaiveTime,
    /// Whether an active appointment currently claims this slot.
    pub is_booked: bool,
    /// When the slot was created.
    pub created_at: DateTime<Utc>,
}

/// A partial edit to an existing slot. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotChange {
    /// New calendar day.
    pub slot_date: Option<NaiveDate>,
    /// New start time.
    pub start_time: Option<NaiveTime>,
    /// New end time.
    pub end_time: Option<NaiveTime>,
}

impl SlotChange {
    /// Whether this change touches anything at all.
    pub fn is_empty(&self) -> bool {
        self.slot_date.is_none() && self.start_time.is_none() && self.end_time.is_none()
    }

    /// Resolve the change against the current slot, producing the full
    /// target (date, start, end) triple.
    pub fn resolve(&self, current: &Slot) -> (NaiveDate, NaiveTime, NaiveTime) {
        (
            self.slot_date.unwrap_or(current.slot_date),
            self.start_time.unwrap_or(current.start_time),
            self.end_time.unwrap_or(current.end_time),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: &str, end: &str) -> Slot {
        Slot {
            id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            slot_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            is_booked: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_slot_change_resolve() {
        let s = slot("09:00:00", "10:00:00");
        let change = SlotChange {
            start_time: Some("09:30:00".parse().unwrap()),
            ..Default::default()
        };
        let (date, start, end) = change.resolve(&s);
        assert_eq!(date, s.slot_date);
        assert_eq!(start, "09:30:00".parse::<NaiveTime>().unwrap());
        assert_eq!(end, s.end_time);
    }
}
