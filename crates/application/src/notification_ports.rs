use async_trait::async_trait;
use serde_json::Value;

use relevar_core::AppResult;
use relevar_domain::{Notification, NotificationId, NotificationKind, UserId};

/// Message fanned out to every administrator.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminNotice {
    /// Human-readable message.
    pub message: String,
    /// Notification category.
    pub kind: NotificationKind,
    /// Administrator left out of the fan-out, usually the actor.
    pub exclude: Option<UserId>,
    /// Optional in-app link.
    pub link: Option<String>,
    /// Optional structured payload.
    pub metadata: Option<Value>,
}

impl AdminNotice {
    /// Creates a notice without link or metadata.
    #[must_use]
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            exclude: None,
            link: None,
            metadata: None,
        }
    }

    /// Leaves `user_id` out of the fan-out.
    #[must_use]
    pub fn excluding(mut self, user_id: UserId) -> Self {
        self.exclude = Some(user_id);
        self
    }

    /// Attaches an in-app link.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Attaches structured metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Repository port for per-user notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Inserts all notifications in one write.
    async fn insert_batch(&self, notifications: &[Notification]) -> AppResult<()>;

    /// Lists notifications of a recipient newest first.
    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>>;

    /// Counts unread notifications of a recipient.
    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64>;

    /// Marks every notification of a recipient as read.
    async fn mark_all_read(&self, recipient_id: UserId) -> AppResult<u64>;

    /// Deletes the listed notifications owned by the recipient.
    async fn delete_many(
        &self,
        recipient_id: UserId,
        notification_ids: &[NotificationId],
    ) -> AppResult<u64>;

    /// Deletes every notification of a recipient.
    async fn delete_all(&self, recipient_id: UserId) -> AppResult<u64>;
}
