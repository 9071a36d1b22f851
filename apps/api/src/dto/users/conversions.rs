use std::str::FromStr;

use relevar_application::{RegisterUserInput, SaveRoleInput, UpdateProfileInput};
use relevar_core::AppError;
use relevar_domain::{
    AccountStatus, EffectiveRole, Permission, Role, UserAccount, effective_role_color,
    effective_role_name,
};

use super::{
    CreateUserRequest, EffectiveRoleResponse, RegisterUserRequest, RoleResponse,
    SaveRoleRequest, UpdateProfileRequest, UserResponse,
};

impl From<RegisterUserRequest> for RegisterUserInput {
    fn from(value: RegisterUserRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            national_id: value.national_id,
            phone: value.phone,
        }
    }
}

impl From<UpdateProfileRequest> for UpdateProfileInput {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            email: value.email,
            national_id: value.national_id,
            phone: value.phone,
        }
    }
}

impl CreateUserRequest {
    /// Splits the payload into the account input and its requested status.
    pub fn into_input(self) -> Result<(RegisterUserInput, AccountStatus), AppError> {
        let status = self
            .status
            .as_deref()
            .map(AccountStatus::from_str)
            .transpose()?
            .unwrap_or(AccountStatus::Active);

        Ok((
            RegisterUserInput {
                username: self.username,
                email: self.email,
                national_id: self.national_id,
                phone: self.phone,
            },
            status,
        ))
    }
}

impl TryFrom<SaveRoleRequest> for SaveRoleInput {
    type Error = AppError;

    fn try_from(value: SaveRoleRequest) -> Result<Self, Self::Error> {
        let permissions = value
            .permissions
            .iter()
            .map(|permission| Permission::from_transport(permission.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: value.name,
            description: value.description,
            color: value.color,
            permissions,
        })
    }
}

impl From<UserAccount> for UserResponse {
    fn from(value: UserAccount) -> Self {
        Self {
            user_id: value.id.to_string(),
            username: value.username.as_str().to_owned(),
            email: value.email.map(|email| email.as_str().to_owned()),
            national_id: value.national_id.map(|id| id.as_str().to_owned()),
            phone: value.phone.map(|phone| phone.as_str().to_owned()),
            role_id: value.role_id.map(|role_id| role_id.to_string()),
            status: value.status.as_str().to_owned(),
            is_superuser: value.is_superuser,
            origin: value.origin.as_str().to_owned(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            description: value.description().to_owned(),
            color: value.color().to_owned(),
            permissions: permission_names(value.permissions()),
        }
    }
}

impl From<Option<EffectiveRole>> for EffectiveRoleResponse {
    fn from(value: Option<EffectiveRole>) -> Self {
        let name = effective_role_name(value.as_ref()).to_owned();
        let color = effective_role_color(value.as_ref()).to_owned();

        match value {
            Some(EffectiveRole::Assigned(role)) => Self {
                name,
                color,
                is_implicit_administrator: false,
                role_id: Some(role.id().to_string()),
                permissions: permission_names(role.permissions()),
            },
            Some(EffectiveRole::ImplicitAdministrator) => Self {
                name,
                color,
                is_implicit_administrator: true,
                role_id: None,
                permissions: permission_names(Permission::all()),
            },
            None => Self {
                name,
                color,
                is_implicit_administrator: false,
                role_id: None,
                permissions: Vec::new(),
            },
        }
    }
}

fn permission_names(permissions: &[Permission]) -> Vec<String> {
    permissions
        .iter()
        .map(|permission| permission.as_str().to_owned())
        .collect()
}
