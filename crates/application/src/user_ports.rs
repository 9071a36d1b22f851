use async_trait::async_trait;

use relevar_core::AppResult;
use relevar_domain::{AccountStatus, Permission, Role, RoleId, UserAccount, UserId};

/// Input payload for self-registration and administrative account creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterUserInput {
    /// Unique login name.
    pub username: String,
    /// Contact email.
    pub email: Option<String>,
    /// National identity number, 7 or 8 digits.
    pub national_id: Option<String>,
    /// Contact phone, 10 digits.
    pub phone: Option<String>,
}

/// Contact details a user edits on their own profile.
///
/// Every field is replaced; `None` or blank clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileInput {
    /// Contact email.
    pub email: Option<String>,
    /// National identity number, 7 or 8 digits.
    pub national_id: Option<String>,
    /// Contact phone, 10 digits.
    pub phone: Option<String>,
}

/// Input payload for creating and editing roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRoleInput {
    /// Unique role name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Badge color token. Blank means the default.
    pub color: Option<String>,
    /// Grants attached to the role.
    pub permissions: Vec<Permission>,
}

/// Repository port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds one account.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Lists accounts ordered by username.
    async fn list_users(&self, status: Option<AccountStatus>) -> AppResult<Vec<UserAccount>>;

    /// Inserts an account. Returns `AppError::Conflict` on a taken username.
    async fn insert_user(&self, account: &UserAccount) -> AppResult<()>;

    /// Persists role, status and contact changes of an account.
    async fn update_user(&self, account: &UserAccount) -> AppResult<()>;

    /// Lists the identifiers of active superusers.
    async fn list_superuser_ids(&self) -> AppResult<Vec<UserId>>;
}

/// Repository port for roles.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds one role.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by case-insensitive name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Inserts a role. Returns `AppError::Conflict` on a taken name.
    async fn insert_role(&self, role: &Role) -> AppResult<()>;

    /// Replaces name, description, color and grants of a role.
    ///
    /// Returns `AppError::Conflict` on a taken name.
    async fn update_role(&self, role: &Role) -> AppResult<()>;

    /// Returns whether any account holds the role.
    async fn role_has_users(&self, role_id: RoleId) -> AppResult<bool>;

    /// Deletes a role. Returns `AppError::Conflict` while accounts hold it.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;
}
