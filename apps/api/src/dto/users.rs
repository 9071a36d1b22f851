use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

mod conversions;

/// Incoming payload for self-registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-user-request.ts"
)]
pub struct RegisterUserRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Incoming payload for administrative account creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Falls back to the guest role.
    #[serde(default)]
    pub role_id: Option<Uuid>,
    /// `active` or `inactive`. Defaults to `active`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Incoming payload for account status changes.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-status-request.ts"
)]
pub struct UpdateUserStatusRequest {
    pub status: String,
}

/// Incoming payload for role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-user-role-request.ts"
)]
pub struct AssignUserRoleRequest {
    pub role_id: Uuid,
}

/// Incoming payload for edits of the caller's own profile.
///
/// Omitted or blank fields are cleared.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-profile-request.ts"
)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Query string of the account listing.
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub status: Option<String>,
}

/// Incoming payload for role creation and edits.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-role-request.ts"
)]
pub struct SaveRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// API representation of an account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub email: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<String>,
    pub status: String,
    pub is_superuser: bool,
    pub origin: String,
    pub created_at: String,
    pub updated_at: String,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub permissions: Vec<String>,
}

/// Role an account acts with, including the display fallbacks.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/effective-role-response.ts"
)]
pub struct EffectiveRoleResponse {
    pub name: String,
    pub color: String,
    /// Set for superusers, who need no role record.
    pub is_implicit_administrator: bool,
    pub role_id: Option<String>,
    pub permissions: Vec<String>,
}
