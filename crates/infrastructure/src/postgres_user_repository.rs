//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use relevar_application::UserRepository;
use relevar_core::{AppError, AppResult, NonEmptyString};
use relevar_domain::{
    AccountOrigin, AccountStatus, EmailAddress, NationalId, PhoneNumber, RoleId, UserAccount,
    UserId,
};

use crate::postgres_codes::conflict_or_internal;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: Option<String>,
    national_id: Option<String>,
    phone: Option<String>,
    role_id: Option<Uuid>,
    status: String,
    is_superuser: bool,
    origin: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            username: NonEmptyString::for_field("username", row.username)?,
            email: row.email.map(EmailAddress::new).transpose()?,
            national_id: row.national_id.map(NationalId::new).transpose()?,
            phone: row.phone.map(PhoneNumber::new).transpose()?,
            role_id: row.role_id.map(RoleId::from_uuid),
            status: row.status.parse::<AccountStatus>()?,
            is_superuser: row.is_superuser,
            origin: row.origin.parse::<AccountOrigin>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_USERS: &str = r#"
    SELECT id, username, email, national_id, phone, role_id, status, is_superuser, origin,
           created_at, updated_at
    FROM users
"#;

fn username_conflict(error: sqlx::Error, operation: &str, account: &UserAccount) -> AppError {
    conflict_or_internal(
        error,
        operation,
        format!("username '{}' is already taken", account.username).as_str(),
    )
}

mod account;
mod lookup;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        self.find_user_impl(user_id).await
    }

    async fn list_users(&self, status: Option<AccountStatus>) -> AppResult<Vec<UserAccount>> {
        self.list_users_impl(status).await
    }

    async fn insert_user(&self, account: &UserAccount) -> AppResult<()> {
        self.insert_user_impl(account).await
    }

    async fn update_user(&self, account: &UserAccount) -> AppResult<()> {
        self.update_user_impl(account).await
    }

    async fn list_superuser_ids(&self) -> AppResult<Vec<UserId>> {
        self.list_superuser_ids_impl().await
    }
}
