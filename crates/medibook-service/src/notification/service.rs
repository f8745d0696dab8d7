//! The durable notification inbox.
//!
//! Writes happen in the realtime dispatcher as events arrive; this
//! service covers the user-facing reads and read-state updates. Read
//! marking is idempotent, so clients retrying after a lost ack do no
//! harm.

use std::sync::Arc;

use uuid::Uuid;

use medibook_core::result::AppResult;
use medibook_core::types::pagination::{PageRequest, PageResponse};
use medibook_database::repositories::notification::NotificationRepository;
use medibook_entity::notification::Notification;

use crate::context::RequestContext;

/// User-facing notification inbox operations.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notification_repo: Arc<NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// The caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.notification_repo.find_by_user(ctx.user_id, &page).await
    }

    /// Number of unread notifications for the caller.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notification_repo.count_unread(ctx.user_id).await
    }

    /// Mark one of the caller's notifications as read. Scoped to the
    /// caller: marking another user's notification affects nothing.
    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        self.notification_repo
            .mark_read(notification_id, ctx.user_id)
            .await
    }

    /// Mark all of the caller's notifications as read; returns how many
    /// were newly marked.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notification_repo.mark_all_read(ctx.user_id).await
    }

    /// Mark-read for callers identified outside a request context (the
    /// WebSocket path, where only the token claims are available).
    pub async fn mark_read_raw(&self, user_id: Uuid, notification_id: Uuid) -> AppResult<()> {
        self.notification_repo
            .mark_read(notification_id, user_id)
            .await
    }
}
