//! User account types and field validation rules.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use relevar_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{RoleId, UserId};

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: exactly one `@`, non-empty local
    /// part, and a domain containing at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// National identity card number: 7 or 8 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NationalId(String);

impl NationalId {
    /// Creates a validated identity number.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_owned();
        if !(7..=8).contains(&value.len()) || !all_ascii_digits(&value) {
            return Err(AppError::Validation(
                "national id must have 7 or 8 digits".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Phone number: exactly 10 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a validated phone number.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_owned();
        if value.len() != 10 || !all_ascii_digits(&value) {
            return Err(AppError::Validation(
                "phone number must have exactly 10 digits".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn all_ascii_digits(value: &str) -> bool {
    value.bytes().all(|byte| byte.is_ascii_digit())
}

/// Approval state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Awaiting approval.
    Pending,
    /// Allowed to work.
    Active,
    /// Disabled.
    Inactive,
}

impl AccountStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown account status '{value}'"
            ))),
        }
    }
}

/// How the account came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountOrigin {
    /// Created through self-registration.
    SelfRegistered,
    /// Created by an administrator.
    AdminCreated,
}

impl AccountOrigin {
    /// Returns a stable storage value for this origin.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfRegistered => "self_registered",
            Self::AdminCreated => "admin_created",
        }
    }
}

impl FromStr for AccountOrigin {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "self_registered" => Ok(Self::SelfRegistered),
            "admin_created" => Ok(Self::AdminCreated),
            _ => Err(AppError::Validation(format!(
                "unknown account origin '{value}'"
            ))),
        }
    }
}

/// User account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Account identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: NonEmptyString,
    /// Contact email.
    pub email: Option<EmailAddress>,
    /// National identity number.
    pub national_id: Option<NationalId>,
    /// Contact phone.
    pub phone: Option<PhoneNumber>,
    /// Assigned role.
    pub role_id: Option<RoleId>,
    /// Approval state.
    pub status: AccountStatus,
    /// Superusers bypass permission checks and cannot be disabled.
    pub is_superuser: bool,
    /// Creation path.
    pub origin: AccountOrigin,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Returns whether the account may act.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Ensures the account may be moved to `next`.
    pub fn ensure_status_change_allowed(&self, next: AccountStatus) -> AppResult<()> {
        if self.is_superuser && next != AccountStatus::Active {
            return Err(AppError::Conflict(format!(
                "superuser '{}' cannot be deactivated",
                self.username
            )));
        }

        Ok(())
    }
}
