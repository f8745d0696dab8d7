//! Notification inbox handlers.

use axum::extract::{Query, State};
use axum::Json;

use crate::dto::request::{MarkReadRequest, PageQuery};
use crate::dto::response::{ApiResponse, MarkReadResponse, NotificationListResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<NotificationListResponse>>, ApiError> {
    let notifications = state
        .notification_service
        .list(&auth, query.to_page_request())
        .await?;
    let unread = state.notification_service.unread_count(&auth).await?;

    Ok(Json(ApiResponse::ok(NotificationListResponse {
        notifications,
        unread,
    })))
}

/// POST /api/notifications/mark-read
///
/// Marks one notification (body `{notificationId}`) or all of the
/// caller's notifications (empty body). Idempotent either way; other
/// open tabs are told to converge via `notification-read`.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<MarkReadRequest>>,
) -> Result<Json<ApiResponse<MarkReadResponse>>, ApiError> {
    let notification_id = body.and_then(|Json(req)| req.notification_id);

    let marked = match notification_id {
        Some(id) => {
            state.notification_service.mark_read(&auth, id).await?;
            1
        }
        None => state.notification_service.mark_all_read(&auth).await?,
    };

    state.dispatcher.push_read(auth.user_id, notification_id);

    Ok(Json(ApiResponse::ok(MarkReadResponse { marked })))
}
