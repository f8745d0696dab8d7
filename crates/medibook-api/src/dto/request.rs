//! Request DTOs.
//!
//! Field names are camelCase to match the web client. Dates and times
//! are ISO-8601 (`2026-09-14`, `09:30`); `chrono`'s serde impls reject
//! anything else, there is no format sniffing.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// POST /api/auth/register
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Plaintext password; policy-checked server-side.
    pub password: String,
    /// Display name.
    pub display_name: Option<String>,
    /// `patient` or `doctor`.
    pub role: String,
    /// Medical specialization (doctors only).
    pub specialization: Option<String>,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email.
    pub login: String,
    /// Plaintext password.
    pub password: String,
}

/// POST /api/appointments/create
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    /// The doctor to book with.
    pub doctor_id: Uuid,
    /// The slot to claim.
    pub slot_id: Uuid,
    /// Optional patient notes.
    pub notes: Option<String>,
}

/// PUT /api/appointments/{id}/status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Target status: `confirmed`, `completed`, or `canceled`.
    pub status: String,
    /// Doctor's comment; required when completing.
    pub doctor_comment: Option<String>,
    /// Cancellation reason; required when a doctor cancels.
    pub cancel_reason: Option<String>,
}

/// PUT /api/appointments/{id}/comment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    /// Revised comment text.
    #[serde(alias = "comment")]
    pub doctor_comment: String,
}

/// DELETE /api/appointments/{id} (optional body)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    /// Cancellation reason; optional for patients.
    pub cancel_reason: Option<String>,
}

/// PUT /api/appointments/admin/{id}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateAppointmentRequest {
    /// New slot date.
    pub slot_date: Option<NaiveDate>,
    /// New start time.
    pub start_time: Option<NaiveTime>,
    /// New end time.
    pub end_time: Option<NaiveTime>,
    /// Forced status.
    pub status: Option<String>,
    /// Cancellation reason (required when forcing `canceled`).
    pub cancel_reason: Option<String>,
}

/// POST /api/appointments/add-slot[/{doctorId}]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSlotRequest {
    /// Slot date (ISO-8601).
    pub slot_date: NaiveDate,
    /// Start time (ISO-8601).
    pub start_time: NaiveTime,
    /// End time (ISO-8601).
    pub end_time: NaiveTime,
}

/// PUT /api/appointments/slot/{id}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlotRequest {
    /// New slot date.
    pub slot_date: Option<NaiveDate>,
    /// New start time.
    pub start_time: Option<NaiveTime>,
    /// New end time.
    pub end_time: Option<NaiveTime>,
}

/// GET /api/appointments/available-slots/{doctorId} query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRangeQuery {
    /// Inclusive start date filter.
    pub from: Option<NaiveDate>,
    /// Inclusive end date filter.
    pub to: Option<NaiveDate>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// POST|PUT /api/doctor-ratings/{doctorId}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    /// Rating value, 0.5–5.0 in half-star steps.
    pub rating: f64,
    /// Optional free-text feedback.
    pub feedback: Option<String>,
}

/// POST /api/notifications/mark-read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    /// The notification to mark; omitted means mark all.
    pub notification_id: Option<Uuid>,
}

/// PUT /api/admin/users/{id}/active
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    /// New active flag.
    pub active: bool,
}

/// Paged list query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

impl PageQuery {
    /// Converts to a clamped `PageRequest`.
    pub fn to_page_request(&self) -> medibook_core::types::pagination::PageRequest {
        let default = medibook_core::types::pagination::PageRequest::default();
        medibook_core::types::pagination::PageRequest::new(
            self.page.unwrap_or(default.page),
            self.page_size.unwrap_or(default.page_size),
        )
    }
}
