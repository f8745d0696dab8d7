//! Auth handlers — register, login, me.

use axum::extract::State;
use axum::Json;
use validator::Validate;

use medibook_core::error::AppError;
use medibook_entity::user::UserRole;
use medibook_service::user::RegisterUser;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, AuthResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let role: UserRole = req.role.parse()?;

    let (user, issued) = state
        .user_service
        .register(RegisterUser {
            username: req.username,
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            role,
            specialization: req.specialization,
        })
        .await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: UserResponse::from(&user),
    })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let (user, issued) = state.user_service.login(&req.login, &req.password).await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: UserResponse::from(&user),
    })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}
