//! PostgreSQL-backed area and objective repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use relevar_application::{AreaRepository, CodeRegistry, CodedInsert, InsertOutcome};
use relevar_core::{AppError, AppResult};
use relevar_domain::{Area, AreaId, CodeScope, EntityCode, Objective, ObjectiveId};

use crate::postgres_codes::{
    begin_coded_insert, code_from_row, code_param, coded_insert_failure, list_codes,
};

/// PostgreSQL implementation of the area repository port.
#[derive(Clone)]
pub struct PostgresAreaRepository {
    pool: PgPool,
}

impl PostgresAreaRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AreaRow {
    id: Uuid,
    name: String,
    description: String,
    code: i32,
}

impl TryFrom<AreaRow> for Area {
    type Error = AppError;

    fn try_from(row: AreaRow) -> Result<Self, Self::Error> {
        Area::new(
            AreaId::from_uuid(row.id),
            row.name,
            row.description,
            code_from_row(row.code)?,
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ObjectiveRow {
    id: Uuid,
    area_id: Uuid,
    name: String,
    description: String,
    code: i32,
}

impl TryFrom<ObjectiveRow> for Objective {
    type Error = AppError;

    fn try_from(row: ObjectiveRow) -> Result<Self, Self::Error> {
        Objective::new(
            ObjectiveId::from_uuid(row.id),
            AreaId::from_uuid(row.area_id),
            row.name,
            row.description,
            code_from_row(row.code)?,
        )
    }
}

#[async_trait]
impl CodeRegistry for PostgresAreaRepository {
    async fn list_codes(&self, scope: CodeScope) -> AppResult<Vec<EntityCode>> {
        list_codes(&self.pool, scope).await
    }
}

#[async_trait]
impl CodedInsert<Area> for PostgresAreaRepository {
    async fn insert_coded(&self, record: &Area) -> AppResult<InsertOutcome> {
        let Some(mut transaction) =
            begin_coded_insert(&self.pool, CodeScope::Areas, record.code()).await?
        else {
            return Ok(InsertOutcome::CodeTaken);
        };

        if let Err(error) =
            sqlx::query("INSERT INTO areas (id, name, description, code) VALUES ($1, $2, $3, $4)")
                .bind(record.id().as_uuid())
                .bind(record.name().as_str())
                .bind(record.description())
                .bind(code_param(record.code())?)
                .execute(&mut *transaction)
                .await
        {
            return coded_insert_failure(error, "areas_code_unique", "insert area");
        }

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit area insert: {error}")))?;

        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl CodedInsert<Objective> for PostgresAreaRepository {
    async fn insert_coded(&self, record: &Objective) -> AppResult<InsertOutcome> {
        let scope = CodeScope::Objectives(record.area_id());
        let Some(mut transaction) = begin_coded_insert(&self.pool, scope, record.code()).await?
        else {
            return Ok(InsertOutcome::CodeTaken);
        };

        if let Err(error) = sqlx::query(
            r#"
            INSERT INTO objectives (id, area_id, name, description, code)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.id().as_uuid())
        .bind(record.area_id().as_uuid())
        .bind(record.name().as_str())
        .bind(record.description())
        .bind(code_param(record.code())?)
        .execute(&mut *transaction)
        .await
        {
            return coded_insert_failure(error, "objectives_area_code_unique", "insert objective");
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit objective insert: {error}"))
        })?;

        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl AreaRepository for PostgresAreaRepository {
    async fn list_areas(&self) -> AppResult<Vec<Area>> {
        sqlx::query_as::<_, AreaRow>("SELECT id, name, description, code FROM areas ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list areas: {error}")))?
            .into_iter()
            .map(Area::try_from)
            .collect()
    }

    async fn find_area(&self, area_id: AreaId) -> AppResult<Option<Area>> {
        sqlx::query_as::<_, AreaRow>(
            "SELECT id, name, description, code FROM areas WHERE id = $1",
        )
        .bind(area_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find area: {error}")))?
        .map(Area::try_from)
        .transpose()
    }

    async fn delete_area(&self, area_id: AreaId) -> AppResult<()> {
        sqlx::query("DELETE FROM areas WHERE id = $1")
            .bind(area_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete area: {error}")))?;

        Ok(())
    }

    async fn list_objectives(&self, area_id: AreaId) -> AppResult<Vec<Objective>> {
        sqlx::query_as::<_, ObjectiveRow>(
            r#"
            SELECT id, area_id, name, description, code
            FROM objectives
            WHERE area_id = $1
            ORDER BY name
            "#,
        )
        .bind(area_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list objectives: {error}")))?
        .into_iter()
        .map(Objective::try_from)
        .collect()
    }

    async fn find_objective(&self, objective_id: ObjectiveId) -> AppResult<Option<Objective>> {
        sqlx::query_as::<_, ObjectiveRow>(
            "SELECT id, area_id, name, description, code FROM objectives WHERE id = $1",
        )
        .bind(objective_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find objective: {error}")))?
        .map(Objective::try_from)
        .transpose()
    }

    async fn delete_objective(&self, objective_id: ObjectiveId) -> AppResult<()> {
        sqlx::query("DELETE FROM objectives WHERE id = $1")
            .bind(objective_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete objective: {error}")))?;

        Ok(())
    }
}
