use std::sync::Arc;

use async_trait::async_trait;
use relevar_core::{AppError, AppResult, UserIdentity};
use relevar_domain::{Permission, UserId};

/// Repository port for permission lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists the permissions granted to an account through its role.
    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>>;
}

/// Application service for permission checks.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Ensures the actor holds `permission`. Superusers always pass.
    pub async fn require_permission(
        &self,
        actor: &UserIdentity,
        permission: Permission,
    ) -> AppResult<()> {
        if self.has_permission(actor, permission).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is missing permission '{}'",
            actor.username(),
            permission.as_str()
        )))
    }

    /// Returns whether the actor currently holds `permission`.
    pub async fn has_permission(
        &self,
        actor: &UserIdentity,
        permission: Permission,
    ) -> AppResult<bool> {
        if actor.is_superuser() {
            return Ok(true);
        }

        let permissions = self
            .repository
            .list_permissions_for_user(UserId::from_uuid(actor.user_id()))
            .await?;

        Ok(permissions.contains(&permission))
    }
}
