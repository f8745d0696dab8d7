//! Admin dashboard handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use medibook_core::types::pagination::PageResponse;
use medibook_service::stats::AdminStats;

use crate::dto::request::{PageQuery, SetActiveRequest};
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AdminStats>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.stats_service.admin_stats(&auth).await?,
    )))
}

/// GET /api/admin/users
pub async fn users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PageResponse<UserResponse>>>, ApiError> {
    let page = state
        .user_service
        .list_all(&auth, query.to_page_request())
        .await?;

    let users = page.items.iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse::ok(PageResponse {
        items: users,
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next: page.has_next,
        has_previous: page.has_previous,
    })))
}

/// PUT /api/admin/users/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.user_service.set_active(&auth, id, body.active).await?;

    let message = if body.active {
        "Account enabled"
    } else {
        "Account disabled"
    };
    Ok(Json(ApiResponse::ok(MessageResponse::new(message))))
}
