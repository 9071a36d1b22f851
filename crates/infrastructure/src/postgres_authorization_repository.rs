use std::str::FromStr;

use async_trait::async_trait;

use relevar_application::AuthorizationRepository;
use relevar_core::{AppError, AppResult};
use relevar_domain::{Permission, UserId};

use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository for permission lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    permission: String,
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT DISTINCT grants.permission
            FROM users
            INNER JOIN role_permissions AS grants
                ON grants.role_id = users.role_id
            WHERE users.id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load permissions: {error}")))?;

        rows.into_iter()
            .map(|row| {
                Permission::from_str(row.permission.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "failed to decode permission '{}' for user '{}': {error}",
                        row.permission, user_id
                    ))
                })
            })
            .collect()
    }
}
