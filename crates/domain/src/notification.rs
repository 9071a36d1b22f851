use std::str::FromStr;

use chrono::{DateTime, Utc};
use relevar_core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{NotificationId, UserId};

/// Category of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new account registered.
    NewUser,
    /// An account was approved.
    UserApproved,
    /// System alert.
    Alert,
    /// Informational change.
    Info,
    /// Change worth double-checking.
    Warning,
    /// Successful change.
    Success,
}

impl NotificationKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewUser => "new_user",
            Self::UserApproved => "user_approved",
            Self::Alert => "alert",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new_user" => Ok(Self::NewUser),
            "user_approved" => Ok(Self::UserApproved),
            "alert" => Ok(Self::Alert),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "success" => Ok(Self::Success),
            _ => Err(AppError::Validation(format!(
                "unknown notification kind '{value}'"
            ))),
        }
    }
}

/// One entry of a user's notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification identifier.
    pub id: NotificationId,
    /// Receiving account.
    pub recipient_id: UserId,
    /// Human-readable message.
    pub message: String,
    /// Category.
    pub kind: NotificationKind,
    /// Optional target link.
    pub link: Option<String>,
    /// Optional structured payload.
    pub metadata: Option<Value>,
    /// Read marker.
    pub read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
