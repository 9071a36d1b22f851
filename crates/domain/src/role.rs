//! Role records and effective-role resolution.
//!
//! Superusers do not need an assigned role: they always resolve to the
//! implicit administrator role.

use relevar_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{Permission, RoleId};

/// Name of the role given to self-registered accounts.
pub const GUEST_ROLE_NAME: &str = "Guest";
/// Badge color used when a role does not pick one.
pub const DEFAULT_ROLE_COLOR: &str = "secondary";
/// Name shown for superusers.
pub const ADMINISTRATOR_ROLE_NAME: &str = "administrator";
/// Badge color shown for superusers.
pub const ADMINISTRATOR_ROLE_COLOR: &str = "danger";
/// Label shown for accounts without any role.
pub const NO_ROLE_LABEL: &str = "no role";
/// Badge color shown for accounts without any role.
pub const NO_ROLE_COLOR: &str = "light";

/// Named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: String,
    color: NonEmptyString,
    permissions: Vec<Permission>,
}

impl Role {
    /// Creates a role. A blank color falls back to [`DEFAULT_ROLE_COLOR`].
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
        color: Option<String>,
        mut permissions: Vec<Permission>,
    ) -> AppResult<Self> {
        let color = color
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE_COLOR.to_owned());
        permissions.sort_by_key(|permission| permission.as_str());
        permissions.dedup();

        Ok(Self {
            id,
            name: NonEmptyString::for_field("role name", name)?,
            description: description.into().trim().to_owned(),
            color: NonEmptyString::for_field("role color", color)?,
            permissions,
        })
    }

    /// Replaces name, description, color and grants. The identifier stays.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        color: Option<String>,
        permissions: Vec<Permission>,
    ) -> AppResult<()> {
        *self = Self::new(self.id, name, description, color, permissions)?;
        Ok(())
    }

    /// Returns whether this is the role given to self-registered accounts.
    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.name.as_str().eq_ignore_ascii_case(GUEST_ROLE_NAME)
    }

    /// Creates the guest role given to self-registered accounts.
    pub fn guest(id: RoleId) -> AppResult<Self> {
        Self::new(
            id,
            GUEST_ROLE_NAME,
            "Registered user without special permissions",
            None,
            Vec::new(),
        )
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the badge color token.
    #[must_use]
    pub fn color(&self) -> &str {
        self.color.as_str()
    }

    /// Returns the granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// Role an account acts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectiveRole {
    /// Role record assigned to the account.
    Assigned(Role),
    /// Superuser without the need for a role record.
    ImplicitAdministrator,
}

impl EffectiveRole {
    /// Resolves the effective role of an account.
    #[must_use]
    pub fn resolve(is_superuser: bool, assigned: Option<Role>) -> Option<Self> {
        if is_superuser {
            return Some(Self::ImplicitAdministrator);
        }

        assigned.map(Self::Assigned)
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Assigned(role) => role.name().as_str(),
            Self::ImplicitAdministrator => ADMINISTRATOR_ROLE_NAME,
        }
    }

    /// Returns the badge color token.
    #[must_use]
    pub fn color(&self) -> &str {
        match self {
            Self::Assigned(role) => role.color(),
            Self::ImplicitAdministrator => ADMINISTRATOR_ROLE_COLOR,
        }
    }

    /// Returns whether the role grants `permission`.
    #[must_use]
    pub fn permits(&self, permission: Permission) -> bool {
        match self {
            Self::Assigned(role) => role.permissions().contains(&permission),
            Self::ImplicitAdministrator => true,
        }
    }
}

/// Display name for an optional effective role.
#[must_use]
pub fn effective_role_name(role: Option<&EffectiveRole>) -> &str {
    role.map(EffectiveRole::name).unwrap_or(NO_ROLE_LABEL)
}

/// Badge color for an optional effective role.
#[must_use]
pub fn effective_role_color(role: Option<&EffectiveRole>) -> &str {
    role.map(EffectiveRole::color).unwrap_or(NO_ROLE_COLOR)
}
