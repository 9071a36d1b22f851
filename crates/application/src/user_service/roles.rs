use super::*;

use crate::user_ports::SaveRoleInput;

impl UserService {
    /// Lists roles ordered by name.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.role_repository.list_roles().await
    }

    /// Creates a role.
    pub async fn create_role(&self, actor: &UserIdentity, input: SaveRoleInput) -> AppResult<Role> {
        self.authorization_service
            .require_permission(actor, Permission::RoleAssign)
            .await?;

        let role = Role::new(
            RoleId::new(),
            input.name,
            input.description,
            input.color,
            input.permissions,
        )?;
        self.role_repository.insert_role(&role).await?;
        Ok(role)
    }

    /// Edits a role and warns the other administrators.
    ///
    /// The guest role keeps its name so self-registration can find it.
    pub async fn update_role(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        input: SaveRoleInput,
    ) -> AppResult<Role> {
        self.authorization_service
            .require_permission(actor, Permission::RoleAssign)
            .await?;

        let mut role = self.require_role(role_id).await?;
        let was_guest = role.is_guest();
        role.update(input.name, input.description, input.color, input.permissions)?;
        if was_guest && !role.is_guest() {
            return Err(AppError::Conflict(
                "the guest role cannot be renamed".to_owned(),
            ));
        }

        self.role_repository.update_role(&role).await?;
        info!(role_id = %role.id(), name = %role.name(), "role updated");

        self.notification_service
            .notify_administrators_quietly(
                AdminNotice::new(
                    format!("Role '{}' was edited by {}", role.name(), actor.username()),
                    NotificationKind::Warning,
                )
                .excluding(UserId::from_uuid(actor.user_id()))
                .with_metadata(json!({
                    "role_id": role.id(),
                    "permissions": role
                        .permissions()
                        .iter()
                        .map(|permission| permission.as_str())
                        .collect::<Vec<_>>(),
                })),
            )
            .await;

        Ok(role)
    }

    /// Deletes a role. The guest role and roles still held by accounts are
    /// kept.
    pub async fn delete_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor, Permission::RoleAssign)
            .await?;

        let role = self.require_role(role_id).await?;
        if role.is_guest() {
            return Err(AppError::Conflict(
                "the guest role cannot be deleted".to_owned(),
            ));
        }
        if self.role_repository.role_has_users(role_id).await? {
            return Err(AppError::Conflict(format!(
                "role '{}' is assigned to one or more users and cannot be deleted",
                role.name()
            )));
        }

        self.role_repository.delete_role(role_id).await
    }
}
