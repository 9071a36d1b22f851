use relevar_domain::Notification;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

/// Query string of the notification feed.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationListQuery {
    pub limit: Option<usize>,
}

/// Incoming payload for deleting several notifications.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/delete-selected-notifications-request.ts"
)]
pub struct DeleteSelectedNotificationsRequest {
    pub notification_ids: Vec<Uuid>,
}

/// API representation of a notification.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/notification-response.ts"
)]
pub struct NotificationResponse {
    pub notification_id: String,
    pub message: String,
    pub kind: String,
    pub link: Option<String>,
    #[ts(type = "Record<string, unknown> | null")]
    pub metadata: Option<Value>,
    pub read: bool,
    pub created_at: String,
}

/// Unread badge counter.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/unread-count-response.ts"
)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

/// Number of notifications touched by a bulk operation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/affected-rows-response.ts"
)]
pub struct AffectedRowsResponse {
    pub affected: u64,
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        Self {
            notification_id: value.id.to_string(),
            message: value.message,
            kind: value.kind.as_str().to_owned(),
            link: value.link,
            metadata: value.metadata,
            read: value.read,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
