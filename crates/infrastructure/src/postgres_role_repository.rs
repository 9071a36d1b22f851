//! PostgreSQL-backed role repository.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use relevar_application::RoleRepository;
use relevar_core::{AppError, AppResult};
use relevar_domain::{Permission, Role, RoleId};

use crate::postgres_codes::{conflict_or_internal, is_foreign_key_violation};

/// PostgreSQL implementation of the role repository port.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    description: String,
    color: String,
    permissions: Vec<String>,
}

impl TryFrom<RoleRow> for Role {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let permissions = row
            .permissions
            .iter()
            .map(|permission| {
                Permission::from_str(permission.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "failed to decode permission '{permission}' for role '{}': {error}",
                        row.id
                    ))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Role::new(
            RoleId::from_uuid(row.id),
            row.name,
            row.description,
            Some(row.color),
            permissions,
        )
    }
}

async fn grant_permissions(
    transaction: &mut Transaction<'static, Postgres>,
    role: &Role,
) -> AppResult<()> {
    let permissions: Vec<&str> = role
        .permissions()
        .iter()
        .map(|permission| permission.as_str())
        .collect();

    sqlx::query(
        r#"
        INSERT INTO role_permissions (role_id, permission)
        SELECT $1, permission FROM UNNEST($2::text[]) AS permission
        "#,
    )
    .bind(role.id().as_uuid())
    .bind(permissions)
    .execute(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to grant role permissions: {error}")))?;

    Ok(())
}

const SELECT_ROLES: &str = r#"
    SELECT roles.id, roles.name, roles.description, roles.color,
           COALESCE(
               ARRAY_AGG(grants.permission ORDER BY grants.permission)
                   FILTER (WHERE grants.permission IS NOT NULL),
               ARRAY[]::text[]
           ) AS permissions
    FROM roles
    LEFT JOIN role_permissions AS grants ON grants.role_id = roles.id
"#;

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let query = format!("{SELECT_ROLES} GROUP BY roles.id ORDER BY LOWER(roles.name)");

        sqlx::query_as::<_, RoleRow>(query.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?
            .into_iter()
            .map(Role::try_from)
            .collect()
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let query = format!("{SELECT_ROLES} WHERE roles.id = $1 GROUP BY roles.id");

        sqlx::query_as::<_, RoleRow>(query.as_str())
            .bind(role_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?
            .map(Role::try_from)
            .transpose()
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let query =
            format!("{SELECT_ROLES} WHERE LOWER(roles.name) = LOWER($1) GROUP BY roles.id");

        sqlx::query_as::<_, RoleRow>(query.as_str())
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find role by name: {error}")))?
            .map(Role::try_from)
            .transpose()
    }

    async fn insert_role(&self, role: &Role) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start role transaction: {error}"))
        })?;

        sqlx::query("INSERT INTO roles (id, name, description, color) VALUES ($1, $2, $3, $4)")
            .bind(role.id().as_uuid())
            .bind(role.name().as_str())
            .bind(role.description())
            .bind(role.color())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                conflict_or_internal(
                    error,
                    "create role",
                    format!("role '{}' already exists", role.name()).as_str(),
                )
            })?;

        grant_permissions(&mut transaction, role).await?;

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit role: {error}")))
    }

    async fn update_role(&self, role: &Role) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start role transaction: {error}"))
        })?;

        let result = sqlx::query(
            "UPDATE roles SET name = $2, description = $3, color = $4 WHERE id = $1",
        )
        .bind(role.id().as_uuid())
        .bind(role.name().as_str())
        .bind(role.description())
        .bind(role.color())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            conflict_or_internal(
                error,
                "update role",
                format!("role '{}' already exists", role.name()).as_str(),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                role.id()
            )));
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role.id().as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to revoke role permissions: {error}"))
            })?;

        grant_permissions(&mut transaction, role).await?;

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit role update: {error}")))
    }

    async fn role_has_users(&self, role_id: RoleId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE role_id = $1)")
            .bind(role_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to check role usage: {error}")))
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                if is_foreign_key_violation(&error) {
                    return AppError::Conflict(format!(
                        "role '{role_id}' is assigned to one or more users and cannot be deleted"
                    ));
                }
                AppError::Internal(format!("failed to delete role: {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        Ok(())
    }
}
