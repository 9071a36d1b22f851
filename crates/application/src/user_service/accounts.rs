use super::*;

impl UserService {
    /// Self-registration. The account starts pending with the guest role and
    /// every administrator is told about it.
    pub async fn register_user(&self, input: RegisterUserInput) -> AppResult<UserAccount> {
        let guest = self.guest_role().await?;
        let account = build_account(
            input,
            Some(guest.id()),
            AccountStatus::Pending,
            AccountOrigin::SelfRegistered,
        )?;
        self.user_repository.insert_user(&account).await?;

        info!(user_id = %account.id, username = %account.username, "user registered");

        self.notification_service
            .notify_administrators_quietly(
                AdminNotice::new(
                    format!("New user '{}' is waiting for approval", account.username),
                    NotificationKind::NewUser,
                )
                .with_link(format!("/users/{}", account.id))
                .with_metadata(json!({
                    "user_id": account.id,
                    "username": account.username.as_str(),
                    "email": account.email.as_ref().map(EmailAddress::as_str),
                    "registered_at": account.created_at,
                })),
            )
            .await;

        Ok(account)
    }

    /// Creates an active superuser without an acting identity.
    ///
    /// Used by the command line to seed the first administrator.
    pub async fn bootstrap_superuser(&self, username: &str) -> AppResult<UserAccount> {
        let mut account = build_account(
            RegisterUserInput {
                username: username.to_owned(),
                ..RegisterUserInput::default()
            },
            None,
            AccountStatus::Active,
            AccountOrigin::AdminCreated,
        )?;
        account.is_superuser = true;
        self.user_repository.insert_user(&account).await?;

        info!(user_id = %account.id, username = %account.username, "superuser created");
        Ok(account)
    }

    /// Administrative account creation. The account starts `active` or
    /// `inactive`, never pending.
    pub async fn create_user(
        &self,
        actor: &UserIdentity,
        input: RegisterUserInput,
        role_id: Option<RoleId>,
        status: AccountStatus,
    ) -> AppResult<UserAccount> {
        self.authorization_service
            .require_permission(actor, Permission::UserManage)
            .await?;

        if status == AccountStatus::Pending {
            return Err(AppError::Validation(
                "administrator-created accounts cannot start pending".to_owned(),
            ));
        }

        let role_id = match role_id {
            Some(role_id) => self.require_role(role_id).await?.id(),
            None => self.guest_role().await?.id(),
        };

        let account = build_account(input, Some(role_id), status, AccountOrigin::AdminCreated)?;
        self.user_repository.insert_user(&account).await?;
        Ok(account)
    }

    /// Assigns a role. Assigning a role also activates the account.
    pub async fn assign_role(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<UserAccount> {
        self.authorization_service
            .require_permission(actor, Permission::RoleAssign)
            .await?;

        let role = self.require_role(role_id).await?;
        let mut account = self.require_user(user_id).await?;
        let was_pending = account.status == AccountStatus::Pending;

        account.role_id = Some(role.id());
        account.status = AccountStatus::Active;
        account.updated_at = Utc::now();
        self.user_repository.update_user(&account).await?;

        let kind = if was_pending {
            NotificationKind::UserApproved
        } else {
            NotificationKind::Info
        };
        self.notification_service
            .notify_administrators_quietly(
                AdminNotice::new(
                    format!(
                        "User '{}' was assigned to role '{}' by {}",
                        account.username,
                        role.name(),
                        actor.username()
                    ),
                    kind,
                )
                .excluding(UserId::from_uuid(actor.user_id()))
                .with_link(format!("/users/{}", account.id)),
            )
            .await;

        Ok(account)
    }

    /// Replaces the contact details of the acting user's own account.
    pub async fn update_profile(
        &self,
        actor: &UserIdentity,
        input: UpdateProfileInput,
    ) -> AppResult<UserAccount> {
        let mut account = self.require_user(UserId::from_uuid(actor.user_id())).await?;
        let contact = ContactFields::parse(input)?;

        account.email = contact.email;
        account.national_id = contact.national_id;
        account.phone = contact.phone;
        account.updated_at = Utc::now();
        self.user_repository.update_user(&account).await?;

        info!(user_id = %account.id, "profile updated");
        Ok(account)
    }

    /// Changes the approval status of an account.
    ///
    /// Approving a pending account needs `user.approve`; other changes need
    /// `user.manage`. Superusers cannot leave the active status.
    pub async fn change_user_status(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        status: AccountStatus,
    ) -> AppResult<UserAccount> {
        let mut account = self.require_user(user_id).await?;
        let approves =
            account.status == AccountStatus::Pending && status == AccountStatus::Active;
        let permission = if approves {
            Permission::UserApprove
        } else {
            Permission::UserManage
        };
        self.authorization_service
            .require_permission(actor, permission)
            .await?;

        account.ensure_status_change_allowed(status)?;
        if account.status == status {
            return Ok(account);
        }

        account.status = status;
        account.updated_at = Utc::now();
        self.user_repository.update_user(&account).await?;

        let kind = match status {
            AccountStatus::Inactive => NotificationKind::Warning,
            _ if approves => NotificationKind::UserApproved,
            _ => NotificationKind::Success,
        };
        self.notify_status_change(actor, &account, kind).await;

        Ok(account)
    }

    /// Returns one account. Users may always read their own.
    pub async fn get_user(&self, actor: &UserIdentity, user_id: UserId) -> AppResult<UserAccount> {
        if actor.user_id() != user_id.as_uuid() {
            self.authorization_service
                .require_permission(actor, Permission::UserManage)
                .await?;
        }

        self.require_user(user_id).await
    }

    /// Lists accounts, optionally by status.
    pub async fn list_users(
        &self,
        actor: &UserIdentity,
        status: Option<AccountStatus>,
    ) -> AppResult<Vec<UserAccount>> {
        self.authorization_service
            .require_permission(actor, Permission::UserManage)
            .await?;

        self.user_repository.list_users(status).await
    }

    /// Resolves the role an account acts with.
    pub async fn effective_role(&self, user_id: UserId) -> AppResult<Option<EffectiveRole>> {
        let account = self.require_user(user_id).await?;
        let assigned = match account.role_id {
            Some(role_id) => self.role_repository.find_role(role_id).await?,
            None => None,
        };

        Ok(EffectiveRole::resolve(account.is_superuser, assigned))
    }

    async fn notify_status_change(
        &self,
        actor: &UserIdentity,
        account: &UserAccount,
        kind: NotificationKind,
    ) {
        self.notification_service
            .notify_administrators_quietly(
                AdminNotice::new(
                    format!(
                        "User '{}' is now {} (changed by {})",
                        account.username,
                        account.status.as_str(),
                        actor.username()
                    ),
                    kind,
                )
                .excluding(UserId::from_uuid(actor.user_id()))
                .with_link(format!("/users/{}", account.id)),
            )
            .await;
    }
}
