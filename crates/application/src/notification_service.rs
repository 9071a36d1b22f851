use std::sync::Arc;

use chrono::Utc;
use relevar_core::{AppError, AppResult, UserIdentity};
use relevar_domain::{Notification, NotificationId, UserId};
use tracing::warn;

use crate::notification_ports::{AdminNotice, NotificationRepository};
use crate::user_ports::UserRepository;

/// Default page size for notification feeds.
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 50;

/// Application service for administrator fan-out and per-user feeds.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
}

impl NotificationService {
    /// Creates a notification service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { repository, users }
    }

    /// Creates one notification per active superuser, minus the excluded one.
    ///
    /// Returns the number of notifications written.
    pub async fn notify_administrators(&self, notice: AdminNotice) -> AppResult<usize> {
        let now = Utc::now();
        let notifications: Vec<Notification> = self
            .users
            .list_superuser_ids()
            .await?
            .into_iter()
            .filter(|user_id| Some(*user_id) != notice.exclude)
            .map(|recipient_id| Notification {
                id: NotificationId::new(),
                recipient_id,
                message: notice.message.clone(),
                kind: notice.kind,
                link: notice.link.clone(),
                metadata: notice.metadata.clone(),
                read: false,
                created_at: now,
            })
            .collect();

        if notifications.is_empty() {
            return Ok(0);
        }

        self.repository.insert_batch(&notifications).await?;
        Ok(notifications.len())
    }

    /// Fan-out used as a side effect of other writes. Failures are logged and
    /// never reach the caller.
    pub async fn notify_administrators_quietly(&self, notice: AdminNotice) {
        let kind = notice.kind;
        if let Err(error) = self.notify_administrators(notice).await {
            warn!(kind = kind.as_str(), %error, "administrator notification failed");
        }
    }

    /// Lists the actor's notifications newest first.
    pub async fn list(&self, actor: &UserIdentity, limit: usize) -> AppResult<Vec<Notification>> {
        let limit = if limit == 0 {
            DEFAULT_NOTIFICATION_LIMIT
        } else {
            limit.min(200)
        };

        self.repository
            .list_for_recipient(recipient(actor), limit)
            .await
    }

    /// Counts the actor's unread notifications.
    pub async fn unread_count(&self, actor: &UserIdentity) -> AppResult<u64> {
        self.repository.count_unread(recipient(actor)).await
    }

    /// Marks all of the actor's notifications as read.
    pub async fn mark_all_read(&self, actor: &UserIdentity) -> AppResult<u64> {
        self.repository.mark_all_read(recipient(actor)).await
    }

    /// Deletes one of the actor's notifications.
    pub async fn delete(
        &self,
        actor: &UserIdentity,
        notification_id: NotificationId,
    ) -> AppResult<()> {
        let deleted = self
            .repository
            .delete_many(recipient(actor), &[notification_id])
            .await?;

        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "notification '{notification_id}' does not exist"
            )));
        }

        Ok(())
    }

    /// Deletes the listed notifications owned by the actor.
    pub async fn delete_selected(
        &self,
        actor: &UserIdentity,
        notification_ids: &[NotificationId],
    ) -> AppResult<u64> {
        if notification_ids.is_empty() {
            return Ok(0);
        }

        self.repository
            .delete_many(recipient(actor), notification_ids)
            .await
    }

    /// Deletes every notification of the actor.
    pub async fn delete_all(&self, actor: &UserIdentity) -> AppResult<u64> {
        self.repository.delete_all(recipient(actor)).await
    }
}

fn recipient(actor: &UserIdentity) -> UserId {
    UserId::from_uuid(actor.user_id())
}
