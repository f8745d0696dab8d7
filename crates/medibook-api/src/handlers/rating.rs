//! Doctor rating handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use medibook_entity::rating::{Rating, RatingEligibility, RatingView};

use crate::dto::request::RatingRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/doctor-ratings/{doctorId}
pub async fn list_for_doctor(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<RatingView>>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.rating_service.list_for_doctor(doctor_id).await?,
    )))
}

/// GET /api/doctor-ratings/can-rate/{doctorId}
pub async fn can_rate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RatingEligibility>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.rating_service.eligibility(&auth, doctor_id).await?,
    )))
}

/// POST /api/doctor-ratings/{doctorId}
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(doctor_id): Path<Uuid>,
    Json(req): Json<RatingRequest>,
) -> Result<Json<ApiResponse<Rating>>, ApiError> {
    let rating = state
        .rating_service
        .submit(&auth, doctor_id, req.rating, req.feedback)
        .await?;
    Ok(Json(ApiResponse::ok(rating)))
}

/// PUT /api/doctor-ratings/{doctorId}
pub async fn revise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(doctor_id): Path<Uuid>,
    Json(req): Json<RatingRequest>,
) -> Result<Json<ApiResponse<Rating>>, ApiError> {
    let rating = state
        .rating_service
        .revise(&auth, doctor_id, req.rating, req.feedback)
        .await?;
    Ok(Json(ApiResponse::ok(rating)))
}

/// DELETE /api/doctor-ratings/{doctorId}/{ratingId}
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((_doctor_id, rating_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.rating_service.remove(&auth, rating_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Rating removed"))))
}
