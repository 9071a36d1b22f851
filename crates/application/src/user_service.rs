use std::sync::Arc;

use chrono::Utc;
use relevar_core::{AppError, AppResult, NonEmptyString, UserIdentity};
use relevar_domain::{
    AccountOrigin, AccountStatus, EffectiveRole, EmailAddress, NationalId, NotificationKind,
    Permission, PhoneNumber, Role, RoleId, UserAccount, UserId,
};
use serde_json::json;
use tracing::info;

use crate::notification_ports::AdminNotice;
use crate::user_ports::{RegisterUserInput, RoleRepository, UpdateProfileInput, UserRepository};
use crate::{AuthorizationService, NotificationService};

mod accounts;
mod roles;

/// Application service for accounts, roles and approval.
#[derive(Clone)]
pub struct UserService {
    authorization_service: AuthorizationService,
    user_repository: Arc<dyn UserRepository>,
    role_repository: Arc<dyn RoleRepository>,
    notification_service: NotificationService,
}

impl UserService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            authorization_service,
            user_repository,
            role_repository,
            notification_service,
        }
    }

    /// Resolves the acting identity of an account.
    ///
    /// Unknown accounts are unauthorized; pending or inactive ones are
    /// forbidden from acting.
    pub async fn resolve_identity(&self, user_id: UserId) -> AppResult<UserIdentity> {
        let account = self
            .user_repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("unknown user '{user_id}'")))?;

        if !account.is_active() {
            return Err(AppError::Forbidden(format!(
                "account '{}' is {}",
                account.username,
                account.status.as_str()
            )));
        }

        Ok(UserIdentity::new(
            account.id.as_uuid(),
            account.username.as_str(),
            account.is_superuser,
        ))
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<UserAccount> {
        self.user_repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    async fn require_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.role_repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    /// Returns the guest role, creating it on first use.
    async fn guest_role(&self) -> AppResult<Role> {
        if let Some(role) = self
            .role_repository
            .find_role_by_name(relevar_domain::GUEST_ROLE_NAME)
            .await?
        {
            return Ok(role);
        }

        let role = Role::guest(RoleId::new())?;
        match self.role_repository.insert_role(&role).await {
            Ok(()) => Ok(role),
            // Lost a race against another first registration.
            Err(AppError::Conflict(_)) => self
                .role_repository
                .find_role_by_name(relevar_domain::GUEST_ROLE_NAME)
                .await?
                .ok_or_else(|| AppError::Internal("guest role vanished".to_owned())),
            Err(error) => Err(error),
        }
    }
}

fn build_account(
    input: RegisterUserInput,
    role_id: Option<RoleId>,
    status: AccountStatus,
    origin: AccountOrigin,
) -> AppResult<UserAccount> {
    let now = Utc::now();
    let contact = ContactFields::parse(UpdateProfileInput {
        email: input.email,
        national_id: input.national_id,
        phone: input.phone,
    })?;

    Ok(UserAccount {
        id: UserId::new(),
        username: NonEmptyString::for_field("username", input.username)?,
        email: contact.email,
        national_id: contact.national_id,
        phone: contact.phone,
        role_id,
        status,
        is_superuser: false,
        origin,
        created_at: now,
        updated_at: now,
    })
}

/// Validated contact details shared by account creation and profile edits.
struct ContactFields {
    email: Option<EmailAddress>,
    national_id: Option<NationalId>,
    phone: Option<PhoneNumber>,
}

impl ContactFields {
    fn parse(input: UpdateProfileInput) -> AppResult<Self> {
        Ok(Self {
            email: non_blank(input.email).map(EmailAddress::new).transpose()?,
            national_id: non_blank(input.national_id)
                .map(NationalId::new)
                .transpose()?,
            phone: non_blank(input.phone).map(PhoneNumber::new).transpose()?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
