//! Appointment lifecycle handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use medibook_core::error::AppError;
use medibook_entity::appointment::{Appointment, AppointmentStatus, AppointmentView};
use medibook_service::appointment::AdminAppointmentUpdate;

use crate::dto::request::{
    AdminUpdateAppointmentRequest, CancelRequest, CommentRequest, CreateAppointmentRequest,
    UpdateStatusRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/appointments/create
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment = state
        .appointment_service
        .create(&auth, req.doctor_id, req.slot_id, req.notes)
        .await?;
    Ok(Json(ApiResponse::ok(appointment)))
}

/// PUT /api/appointments/{id}/status
///
/// Doctor-side transitions: `confirmed`, `completed` (with comment), or
/// `canceled` (with reason).
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let status: AppointmentStatus = req.status.parse()?;

    let appointment = match status {
        AppointmentStatus::Confirmed => state.appointment_service.confirm(&auth, id).await?,
        AppointmentStatus::Completed => {
            let comment = req
                .doctor_comment
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| {
                    AppError::validation("A doctor comment is required to complete an appointment")
                })?;
            state.appointment_service.complete(&auth, id, comment).await?
        }
        AppointmentStatus::Canceled => {
            state
                .appointment_service
                .cancel(&auth, id, req.cancel_reason)
                .await?
        }
        AppointmentStatus::Pending => {
            return Err(AppError::validation("Appointments cannot be reset to pending").into());
        }
    };

    Ok(Json(ApiResponse::ok(appointment)))
}

/// PUT /api/appointments/{id}/comment
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let appointment = state
        .appointment_service
        .update_comment(&auth, id, req.doctor_comment)
        .await?;
    Ok(Json(ApiResponse::ok(appointment)))
}

/// DELETE /api/appointments/{id} — cancel; body optional.
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<CancelRequest>>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let reason = body.and_then(|Json(req)| req.cancel_reason);
    let appointment = state.appointment_service.cancel(&auth, id, reason).await?;
    Ok(Json(ApiResponse::ok(appointment)))
}

/// PUT /api/appointments/admin/{id}
pub async fn admin_update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AdminUpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    let status = req
        .status
        .as_deref()
        .map(str::parse::<AppointmentStatus>)
        .transpose()?;

    let appointment = state
        .appointment_service
        .admin_update(
            &auth,
            id,
            AdminAppointmentUpdate {
                slot_date: req.slot_date,
                start_time: req.start_time,
                end_time: req.end_time,
                status,
                cancel_reason: req.cancel_reason,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(appointment)))
}

/// DELETE /api/appointments/admin/{id}
pub async fn admin_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.appointment_service.admin_delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Appointment deleted",
    ))))
}

/// GET /api/appointments/patient
pub async fn list_for_patient(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentView>>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.appointment_service.list_for_patient(&auth).await?,
    )))
}

/// GET /api/appointments/doctor
pub async fn list_for_doctor(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentView>>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.appointment_service.list_for_doctor(&auth).await?,
    )))
}

/// GET /api/appointments/doctor/recent
pub async fn recent_for_doctor(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentView>>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.appointment_service.recent_for_doctor(&auth).await?,
    )))
}

/// GET /api/appointments/admin/all
pub async fn list_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentView>>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.appointment_service.list_all(&auth).await?,
    )))
}

/// GET /api/appointments/admin/recent
pub async fn recent_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentView>>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.appointment_service.recent_all(&auth).await?,
    )))
}
