//! PostgreSQL-backed department, district and neighborhood repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use relevar_application::{
    CodeRegistry, CodedInsert, GeographyRepository, InsertOutcome, NeighborhoodFilter,
};
use relevar_core::{AppError, AppResult};
use relevar_domain::{
    CodeScope, Department, DepartmentId, District, DistrictId, EntityCode, Neighborhood,
    NeighborhoodId,
};

use crate::postgres_codes::{
    begin_coded_insert, code_from_row, code_param, coded_insert_failure, conflict_or_internal,
    is_foreign_key_violation, list_codes,
};

mod neighborhoods;

/// PostgreSQL implementation of the geography repository port.
#[derive(Clone)]
pub struct PostgresGeographyRepository {
    pool: PgPool,
}

impl PostgresGeographyRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DepartmentRow {
    id: Uuid,
    name: String,
    code: i32,
}

impl TryFrom<DepartmentRow> for Department {
    type Error = AppError;

    fn try_from(row: DepartmentRow) -> Result<Self, Self::Error> {
        Department::new(
            DepartmentId::from_uuid(row.id),
            row.name,
            code_from_row(row.code)?,
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DistrictRow {
    id: Uuid,
    department_id: Uuid,
    name: String,
    code: i32,
}

impl TryFrom<DistrictRow> for District {
    type Error = AppError;

    fn try_from(row: DistrictRow) -> Result<Self, Self::Error> {
        District::new(
            DistrictId::from_uuid(row.id),
            DepartmentId::from_uuid(row.department_id),
            row.name,
            code_from_row(row.code)?,
        )
    }
}

#[async_trait]
impl CodeRegistry for PostgresGeographyRepository {
    async fn list_codes(&self, scope: CodeScope) -> AppResult<Vec<EntityCode>> {
        list_codes(&self.pool, scope).await
    }
}

#[async_trait]
impl CodedInsert<Department> for PostgresGeographyRepository {
    async fn insert_coded(&self, record: &Department) -> AppResult<InsertOutcome> {
        let Some(mut transaction) =
            begin_coded_insert(&self.pool, CodeScope::Departments, record.code()).await?
        else {
            return Ok(InsertOutcome::CodeTaken);
        };

        if let Err(error) =
            sqlx::query("INSERT INTO departments (id, name, code) VALUES ($1, $2, $3)")
                .bind(record.id().as_uuid())
                .bind(record.name().as_str())
                .bind(code_param(record.code())?)
                .execute(&mut *transaction)
                .await
        {
            return coded_insert_failure(error, "departments_code_unique", "insert department");
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit department insert: {error}"))
        })?;

        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl CodedInsert<District> for PostgresGeographyRepository {
    async fn insert_coded(&self, record: &District) -> AppResult<InsertOutcome> {
        let Some(mut transaction) =
            begin_coded_insert(&self.pool, CodeScope::Districts, record.code()).await?
        else {
            return Ok(InsertOutcome::CodeTaken);
        };

        if let Err(error) = sqlx::query(
            "INSERT INTO districts (id, department_id, name, code) VALUES ($1, $2, $3, $4)",
        )
        .bind(record.id().as_uuid())
        .bind(record.department_id().as_uuid())
        .bind(record.name().as_str())
        .bind(code_param(record.code())?)
        .execute(&mut *transaction)
        .await
        {
            return coded_insert_failure(error, "districts_code_unique", "insert district");
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit district insert: {error}"))
        })?;

        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl CodedInsert<Neighborhood> for PostgresGeographyRepository {
    async fn insert_coded(&self, record: &Neighborhood) -> AppResult<InsertOutcome> {
        self.insert_neighborhood_impl(record).await
    }
}

#[async_trait]
impl GeographyRepository for PostgresGeographyRepository {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        sqlx::query_as::<_, DepartmentRow>(
            "SELECT id, name, code FROM departments ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list departments: {error}")))?
        .into_iter()
        .map(Department::try_from)
        .collect()
    }

    async fn find_department(&self, department_id: DepartmentId) -> AppResult<Option<Department>> {
        sqlx::query_as::<_, DepartmentRow>("SELECT id, name, code FROM departments WHERE id = $1")
            .bind(department_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find department: {error}")))?
            .map(Department::try_from)
            .transpose()
    }

    async fn update_department(&self, department: &Department) -> AppResult<()> {
        sqlx::query("UPDATE departments SET name = $2 WHERE id = $1")
            .bind(department.id().as_uuid())
            .bind(department.name().as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                conflict_or_internal(
                    error,
                    "update department",
                    &format!("department name '{}' is already in use", department.name()),
                )
            })?;

        Ok(())
    }

    async fn delete_department(&self, department_id: DepartmentId) -> AppResult<()> {
        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(department_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| restrict_or_internal(error, "delete department", "department"))?;

        Ok(())
    }

    async fn department_has_districts(&self, department_id: DepartmentId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM districts WHERE department_id = $1)",
        )
        .bind(department_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to inspect department: {error}")))
    }

    async fn list_districts(&self, department_id: Option<DepartmentId>) -> AppResult<Vec<District>> {
        sqlx::query_as::<_, DistrictRow>(
            r#"
            SELECT d.id, d.department_id, d.name, d.code
            FROM districts d
            JOIN departments p ON p.id = d.department_id
            WHERE ($1::uuid IS NULL OR d.department_id = $1)
            ORDER BY p.name, d.name
            "#,
        )
        .bind(department_id.map(|value| value.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list districts: {error}")))?
        .into_iter()
        .map(District::try_from)
        .collect()
    }

    async fn find_district(&self, district_id: DistrictId) -> AppResult<Option<District>> {
        sqlx::query_as::<_, DistrictRow>(
            "SELECT id, department_id, name, code FROM districts WHERE id = $1",
        )
        .bind(district_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find district: {error}")))?
        .map(District::try_from)
        .transpose()
    }

    async fn update_district(&self, district: &District) -> AppResult<()> {
        sqlx::query("UPDATE districts SET name = $2, department_id = $3 WHERE id = $1")
            .bind(district.id().as_uuid())
            .bind(district.name().as_str())
            .bind(district.department_id().as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                conflict_or_internal(
                    error,
                    "update district",
                    &format!(
                        "district name '{}' is already in use in its department",
                        district.name()
                    ),
                )
            })?;

        Ok(())
    }

    async fn delete_district(&self, district_id: DistrictId) -> AppResult<()> {
        sqlx::query("DELETE FROM districts WHERE id = $1")
            .bind(district_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| restrict_or_internal(error, "delete district", "district"))?;

        Ok(())
    }

    async fn district_has_neighborhoods(&self, district_id: DistrictId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM neighborhood_districts WHERE district_id = $1)",
        )
        .bind(district_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to inspect district: {error}")))
    }

    async fn list_neighborhoods(&self, filter: NeighborhoodFilter) -> AppResult<Vec<Neighborhood>> {
        self.list_neighborhoods_impl(filter).await
    }

    async fn find_neighborhood(
        &self,
        neighborhood_id: NeighborhoodId,
    ) -> AppResult<Option<Neighborhood>> {
        self.find_neighborhood_impl(neighborhood_id).await
    }

    async fn update_neighborhood(&self, neighborhood: &Neighborhood) -> AppResult<()> {
        self.update_neighborhood_impl(neighborhood).await
    }

    async fn delete_neighborhood(&self, neighborhood_id: NeighborhoodId) -> AppResult<()> {
        sqlx::query("DELETE FROM neighborhoods WHERE id = $1")
            .bind(neighborhood_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| restrict_or_internal(error, "delete neighborhood", "neighborhood"))?;

        Ok(())
    }

    async fn neighborhood_has_activity(&self, neighborhood_id: NeighborhoodId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM survey_requests WHERE neighborhood_id = $1)
                OR EXISTS (SELECT 1 FROM surveys WHERE neighborhood_id = $1)
            "#,
        )
        .bind(neighborhood_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to inspect neighborhood: {error}")))
    }
}

/// Deletes blocked by a restricting foreign key surface as `Conflict`.
fn restrict_or_internal(error: sqlx::Error, operation: &str, entity: &str) -> AppError {
    if is_foreign_key_violation(&error) {
        return AppError::Conflict(format!("{entity} is still referenced"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
