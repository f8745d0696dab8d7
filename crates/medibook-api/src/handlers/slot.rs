//! Slot management handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use medibook_core::types::pagination::{PageRequest, PageResponse};
use medibook_entity::slot::{Slot, SlotChange};

use crate::dto::request::{AddSlotRequest, SlotRangeQuery, UpdateSlotRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/appointments/add-slot — doctor adds their own slot.
pub async fn add_own(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AddSlotRequest>,
) -> Result<Json<ApiResponse<Slot>>, ApiError> {
    let slot = state
        .slot_service
        .add_slot(&auth, None, req.slot_date, req.start_time, req.end_time)
        .await?;
    Ok(Json(ApiResponse::ok(slot)))
}

/// POST /api/appointments/add-slot/{doctorId} — admin adds on behalf.
pub async fn add_for_doctor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(doctor_id): Path<Uuid>,
    Json(req): Json<AddSlotRequest>,
) -> Result<Json<ApiResponse<Slot>>, ApiError> {
    let slot = state
        .slot_service
        .add_slot(
            &auth,
            Some(doctor_id),
            req.slot_date,
            req.start_time,
            req.end_time,
        )
        .await?;
    Ok(Json(ApiResponse::ok(slot)))
}

/// PUT /api/appointments/slot/{id} (also mounted under /admin/slot/{id})
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSlotRequest>,
) -> Result<Json<ApiResponse<Slot>>, ApiError> {
    let slot = state
        .slot_service
        .edit_slot(
            &auth,
            id,
            SlotChange {
                slot_date: req.slot_date,
                start_time: req.start_time,
                end_time: req.end_time,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(slot)))
}

/// DELETE /api/appointments/slot/{id} (also mounted under /admin/slot/{id})
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.slot_service.delete_slot(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Slot deleted"))))
}

/// GET /api/appointments/available-slots/{doctorId}
///
/// Public to any authenticated user; stable ordering so pages can be
/// re-fetched or iteration restarted.
pub async fn list_available(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotRangeQuery>,
) -> Result<Json<ApiResponse<PageResponse<Slot>>>, ApiError> {
    let default = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(default.page),
        query.page_size.unwrap_or(default.page_size),
    );
    let slots = state
        .slot_service
        .list_available(doctor_id, query.from, query.to, page)
        .await?;
    Ok(Json(ApiResponse::ok(slots)))
}

/// GET /api/appointments/doctor-slots — doctor's own management view.
pub async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Slot>>>, ApiError> {
    let slots = state.slot_service.list_for_doctor(&auth, None).await?;
    Ok(Json(ApiResponse::ok(slots)))
}

/// GET /api/appointments/doctor-slots/{doctorId} — admin inspects any
/// doctor's slots.
pub async fn list_for_doctor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Slot>>>, ApiError> {
    let slots = state
        .slot_service
        .list_for_doctor(&auth, Some(doctor_id))
        .await?;
    Ok(Json(ApiResponse::ok(slots)))
}
