use relevar_application::{
    AuthorizationRepository, NotificationRepository, RoleRepository, UserRepository,
};
use relevar_domain::{AccountStatus, NotificationId, Permission};

use super::*;

fn username_taken(account: &UserAccount) -> AppError {
    AppError::Conflict(format!("username '{}' is already taken", account.username))
}

fn role_assigned(role_id: RoleId) -> AppError {
    AppError::Conflict(format!(
        "role '{role_id}' is assigned to one or more users and cannot be deleted"
    ))
}

fn role_in_use(state: &InMemoryState, role_id: RoleId) -> bool {
    state
        .users
        .values()
        .any(|account| account.role_id == Some(role_id))
}

fn removed_count(before: usize, after: usize) -> u64 {
    u64::try_from(before.saturating_sub(after)).unwrap_or(u64::MAX)
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn list_users(&self, status: Option<AccountStatus>) -> AppResult<Vec<UserAccount>> {
        let mut users: Vec<UserAccount> = self
            .state
            .read()
            .await
            .users
            .values()
            .filter(|account| status.is_none_or(|status| account.status == status))
            .cloned()
            .collect();
        users.sort_by_key(|account| account.username.as_str().to_lowercase());

        Ok(users)
    }

    async fn insert_user(&self, account: &UserAccount) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state
            .users
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(username_taken(account));
        }

        state.users.insert(account.id, account.clone());
        Ok(())
    }

    async fn update_user(&self, account: &UserAccount) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state
            .users
            .values()
            .any(|existing| existing.id != account.id && existing.username == account.username)
        {
            return Err(username_taken(account));
        }

        let Some(existing) = state.users.get_mut(&account.id) else {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                account.id
            )));
        };
        *existing = account.clone();

        Ok(())
    }

    async fn list_superuser_ids(&self) -> AppResult<Vec<UserId>> {
        let state = self.state.read().await;
        let mut superusers: Vec<&UserAccount> = state
            .users
            .values()
            .filter(|account| account.is_superuser && account.is_active())
            .collect();
        superusers.sort_by_key(|account| account.created_at);

        Ok(superusers.into_iter().map(|account| account.id).collect())
    }
}

#[async_trait]
impl RoleRepository for InMemoryRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.state.read().await.roles.values().cloned().collect();
        roles.sort_by_key(|role| role.name().as_str().to_lowercase());

        Ok(roles)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let wanted = name.trim().to_lowercase();

        Ok(self
            .state
            .read()
            .await
            .roles
            .values()
            .find(|role| role.name().as_str().to_lowercase() == wanted)
            .cloned())
    }

    async fn insert_role(&self, role: &Role) -> AppResult<()> {
        let mut state = self.state.write().await;
        let wanted = role.name().as_str().to_lowercase();

        if state
            .roles
            .values()
            .any(|existing| existing.name().as_str().to_lowercase() == wanted)
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        state.roles.insert(role.id(), role.clone());
        Ok(())
    }

    async fn update_role(&self, role: &Role) -> AppResult<()> {
        let mut state = self.state.write().await;
        let wanted = role.name().as_str().to_lowercase();

        if state.roles.values().any(|existing| {
            existing.id() != role.id() && existing.name().as_str().to_lowercase() == wanted
        }) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        let Some(existing) = state.roles.get_mut(&role.id()) else {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                role.id()
            )));
        };
        *existing = role.clone();

        Ok(())
    }

    async fn role_has_users(&self, role_id: RoleId) -> AppResult<bool> {
        Ok(role_in_use(&*self.state.read().await, role_id))
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;

        if role_in_use(&state, role_id) {
            return Err(role_assigned(role_id));
        }
        if state.roles.remove(&role_id).is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        Ok(())
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryRepository {
    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;

        Ok(state
            .users
            .get(&user_id)
            .and_then(|account| account.role_id)
            .and_then(|role_id| state.roles.get(&role_id))
            .map(|role| role.permissions().to_vec())
            .unwrap_or_default())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryRepository {
    async fn insert_batch(&self, notifications: &[Notification]) -> AppResult<()> {
        let mut state = self.state.write().await;

        if let Some(orphan) = notifications
            .iter()
            .find(|notification| !state.users.contains_key(&notification.recipient_id))
        {
            return Err(AppError::NotFound(format!(
                "recipient '{}' does not exist",
                orphan.recipient_id
            )));
        }

        state.notifications.extend_from_slice(notifications);
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>> {
        let mut feed: Vec<Notification> = self
            .state
            .read()
            .await
            .notifications
            .iter()
            .rev()
            .filter(|notification| notification.recipient_id == recipient_id)
            .cloned()
            .collect();
        feed.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        feed.truncate(limit);

        Ok(feed)
    }

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64> {
        let unread = self
            .state
            .read()
            .await
            .notifications
            .iter()
            .filter(|notification| notification.recipient_id == recipient_id && !notification.read)
            .count();

        Ok(u64::try_from(unread).unwrap_or(u64::MAX))
    }

    async fn mark_all_read(&self, recipient_id: UserId) -> AppResult<u64> {
        let mut updated = 0_u64;
        for notification in self.state.write().await.notifications.iter_mut() {
            if notification.recipient_id == recipient_id && !notification.read {
                notification.read = true;
                updated += 1;
            }
        }

        Ok(updated)
    }

    async fn delete_many(
        &self,
        recipient_id: UserId,
        notification_ids: &[NotificationId],
    ) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.notifications.len();
        state.notifications.retain(|notification| {
            notification.recipient_id != recipient_id
                || !notification_ids.contains(&notification.id)
        });

        Ok(removed_count(before, state.notifications.len()))
    }

    async fn delete_all(&self, recipient_id: UserId) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.notifications.len();
        state
            .notifications
            .retain(|notification| notification.recipient_id != recipient_id);

        Ok(removed_count(before, state.notifications.len()))
    }
}
