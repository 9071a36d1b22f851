//! PostgreSQL-backed notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use relevar_application::NotificationRepository;
use relevar_core::{AppError, AppResult};
use relevar_domain::{Notification, NotificationId, NotificationKind, UserId};

/// PostgreSQL implementation of the notification repository port.
#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_id: Uuid,
    message: String,
    kind: String,
    link: Option<String>,
    metadata: Option<Value>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: NotificationId::from_uuid(row.id),
            recipient_id: UserId::from_uuid(row.recipient_id),
            message: row.message,
            kind: row.kind.parse::<NotificationKind>()?,
            link: row.link,
            metadata: row.metadata,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn insert_batch(&self, notifications: &[Notification]) -> AppResult<()> {
        if notifications.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO notifications (id, recipient_id, message, kind, link, metadata, read, created_at) ",
        );
        builder.push_values(notifications, |mut row, notification| {
            row.push_bind(notification.id.as_uuid())
                .push_bind(notification.recipient_id.as_uuid())
                .push_bind(notification.message.as_str())
                .push_bind(notification.kind.as_str())
                .push_bind(notification.link.as_deref())
                .push_bind(notification.metadata.as_ref())
                .push_bind(notification.read)
                .push_bind(notification.created_at);
        });

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to insert notifications: {error}"))
            })?;

        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, recipient_id, message, kind, link, metadata, read, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2
            "#,
        )
        .bind(recipient_id.as_uuid())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list notifications: {error}")))?
        .into_iter()
        .map(Notification::try_from)
        .collect()
    }

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND NOT read",
        )
        .bind(recipient_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count notifications: {error}")))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn mark_all_read(&self, recipient_id: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE recipient_id = $1 AND NOT read",
        )
        .bind(recipient_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to mark notifications: {error}")))?;

        Ok(result.rows_affected())
    }

    async fn delete_many(
        &self,
        recipient_id: UserId,
        notification_ids: &[NotificationId],
    ) -> AppResult<u64> {
        let ids: Vec<Uuid> = notification_ids.iter().map(|id| id.as_uuid()).collect();

        let result = sqlx::query(
            "DELETE FROM notifications WHERE recipient_id = $1 AND id = ANY($2)",
        )
        .bind(recipient_id.as_uuid())
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete notifications: {error}")))?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self, recipient_id: UserId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = $1")
            .bind(recipient_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete notifications: {error}"))
            })?;

        Ok(result.rows_affected())
    }
}
