use std::str::FromStr;

use relevar_core::AppError;
use serde::{Deserialize, Serialize};

/// Permissions enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows creating, editing and deleting departments, districts,
    /// neighborhoods, areas and objectives.
    GeographyManage,
    /// Allows opening survey requests.
    RequestCreate,
    /// Allows moving requests through the workflow.
    RequestTransition,
    /// Allows recording surveys.
    SurveyRecord,
    /// Allows creating accounts and changing their status.
    UserManage,
    /// Allows assigning roles to accounts.
    RoleAssign,
    /// Allows approving pending accounts.
    UserApprove,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeographyManage => "geography.manage",
            Self::RequestCreate => "request.create",
            Self::RequestTransition => "request.transition",
            Self::SurveyRecord => "survey.record",
            Self::UserManage => "user.manage",
            Self::RoleAssign => "role.assign",
            Self::UserApprove => "user.approve",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::GeographyManage,
            Permission::RequestCreate,
            Permission::RequestTransition,
            Permission::SurveyRecord,
            Permission::UserManage,
            Permission::RoleAssign,
            Permission::UserApprove,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}
