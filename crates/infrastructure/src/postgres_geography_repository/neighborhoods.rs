use relevar_domain::NeighborhoodStatus;
use sqlx::{Postgres, Transaction};

use super::*;

#[derive(Debug, sqlx::FromRow)]
struct NeighborhoodRow {
    id: Uuid,
    name: String,
    code: i32,
    status: String,
    parent_property: Option<String>,
    parent_registry: Option<String>,
    district_ids: Vec<Uuid>,
}

impl TryFrom<NeighborhoodRow> for Neighborhood {
    type Error = AppError;

    fn try_from(row: NeighborhoodRow) -> Result<Self, Self::Error> {
        Neighborhood::new(
            NeighborhoodId::from_uuid(row.id),
            row.name,
            code_from_row(row.code)?,
            row.status.parse::<NeighborhoodStatus>()?,
            row.parent_property,
            row.parent_registry,
            row.district_ids
                .into_iter()
                .map(DistrictId::from_uuid)
                .collect(),
        )
    }
}

const SELECT_NEIGHBORHOODS: &str = r#"
    SELECT
        n.id,
        n.name,
        n.code,
        n.status,
        n.parent_property,
        n.parent_registry,
        COALESCE(
            ARRAY_AGG(nd.district_id ORDER BY nd.district_id)
                FILTER (WHERE nd.district_id IS NOT NULL),
            '{}'
        ) AS district_ids
    FROM neighborhoods n
    LEFT JOIN neighborhood_districts nd ON nd.neighborhood_id = n.id
"#;

impl PostgresGeographyRepository {
    pub(super) async fn insert_neighborhood_impl(
        &self,
        record: &Neighborhood,
    ) -> AppResult<InsertOutcome> {
        let Some(mut transaction) =
            begin_coded_insert(&self.pool, CodeScope::Neighborhoods, record.code()).await?
        else {
            return Ok(InsertOutcome::CodeTaken);
        };

        if let Err(error) = sqlx::query(
            r#"
            INSERT INTO neighborhoods (id, name, code, status, parent_property, parent_registry)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id().as_uuid())
        .bind(record.name().as_str())
        .bind(code_param(record.code())?)
        .bind(record.status().as_str())
        .bind(record.parent_property())
        .bind(record.parent_registry())
        .execute(&mut *transaction)
        .await
        {
            return coded_insert_failure(error, "neighborhoods_code_unique", "insert neighborhood");
        }

        replace_district_links(&mut transaction, record).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit neighborhood insert: {error}"))
        })?;

        Ok(InsertOutcome::Inserted)
    }

    pub(super) async fn list_neighborhoods_impl(
        &self,
        filter: NeighborhoodFilter,
    ) -> AppResult<Vec<Neighborhood>> {
        let query = format!(
            r#"
            {SELECT_NEIGHBORHOODS}
            WHERE ($1::text IS NULL OR POSITION(LOWER($1) IN LOWER(n.name)) > 0)
              AND ($2::text IS NULL OR n.status = $2)
              AND (
                  $3::uuid IS NULL
                  OR EXISTS (
                      SELECT 1 FROM neighborhood_districts f
                      WHERE f.neighborhood_id = n.id AND f.district_id = $3
                  )
              )
            GROUP BY n.id
            ORDER BY n.name
            "#
        );

        sqlx::query_as::<_, NeighborhoodRow>(query.as_str())
            .bind(filter.name_contains)
            .bind(filter.status.map(|status| status.as_str()))
            .bind(filter.district_id.map(|value| value.as_uuid()))
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list neighborhoods: {error}")))?
            .into_iter()
            .map(Neighborhood::try_from)
            .collect()
    }

    pub(super) async fn find_neighborhood_impl(
        &self,
        neighborhood_id: NeighborhoodId,
    ) -> AppResult<Option<Neighborhood>> {
        let query = format!("{SELECT_NEIGHBORHOODS} WHERE n.id = $1 GROUP BY n.id");

        sqlx::query_as::<_, NeighborhoodRow>(query.as_str())
            .bind(neighborhood_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find neighborhood: {error}")))?
            .map(Neighborhood::try_from)
            .transpose()
    }

    pub(super) async fn update_neighborhood_impl(&self, neighborhood: &Neighborhood) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start neighborhood update: {error}"))
        })?;

        sqlx::query(
            r#"
            UPDATE neighborhoods
            SET name = $2, status = $3, parent_property = $4, parent_registry = $5
            WHERE id = $1
            "#,
        )
        .bind(neighborhood.id().as_uuid())
        .bind(neighborhood.name().as_str())
        .bind(neighborhood.status().as_str())
        .bind(neighborhood.parent_property())
        .bind(neighborhood.parent_registry())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            conflict_or_internal(
                error,
                "update neighborhood",
                &format!("neighborhood name '{}' is already in use", neighborhood.name()),
            )
        })?;

        replace_district_links(&mut transaction, neighborhood).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit neighborhood update: {error}"))
        })
    }
}

async fn replace_district_links(
    transaction: &mut Transaction<'static, Postgres>,
    neighborhood: &Neighborhood,
) -> AppResult<()> {
    sqlx::query("DELETE FROM neighborhood_districts WHERE neighborhood_id = $1")
        .bind(neighborhood.id().as_uuid())
        .execute(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to unlink districts: {error}")))?;

    let district_ids: Vec<Uuid> = neighborhood
        .district_ids()
        .iter()
        .map(DistrictId::as_uuid)
        .collect();

    sqlx::query(
        r#"
        INSERT INTO neighborhood_districts (neighborhood_id, district_id)
        SELECT $1, district_id FROM UNNEST($2::uuid[]) AS district_id
        "#,
    )
    .bind(neighborhood.id().as_uuid())
    .bind(district_ids)
    .execute(&mut **transaction)
    .await
    .map_err(|error| {
        if is_foreign_key_violation(&error) {
            return AppError::NotFound("a linked district does not exist".to_owned());
        }
        AppError::Internal(format!("failed to link districts: {error}"))
    })?;

    Ok(())
}
