//! Doctor directory handlers.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/doctors — directory, best-rated first.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let doctors = state.user_service.list_doctors().await?;
    Ok(Json(ApiResponse::ok(
        doctors.iter().map(UserResponse::from).collect(),
    )))
}

/// GET /api/doctors/{id}
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let doctor = state.user_service.find_doctor(id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(&doctor))))
}
