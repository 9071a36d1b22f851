//! PostgreSQL-backed survey repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use relevar_application::SurveyRepository;
use relevar_core::{AppError, AppResult};
use relevar_domain::{
    NeighborhoodId, RequestId, Survey, SurveyId, SurveyParts, SurveyRequest, UserId,
    ensure_request_accepts_survey,
};

use crate::postgres_codes::is_unique_violation;
use crate::postgres_request_repository::{RequestRow, SELECT_REQUESTS};

/// PostgreSQL implementation of the survey repository port.
#[derive(Clone)]
pub struct PostgresSurveyRepository {
    pool: PgPool,
}

impl PostgresSurveyRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SurveyRow {
    id: Uuid,
    neighborhood_id: Uuid,
    request_id: Option<Uuid>,
    performed_at: DateTime<Utc>,
    data: Value,
    performed_by: Option<Uuid>,
}

impl TryFrom<SurveyRow> for Survey {
    type Error = AppError;

    fn try_from(row: SurveyRow) -> Result<Self, Self::Error> {
        let survey_id = row.id;
        Survey::new(SurveyParts {
            id: SurveyId::from_uuid(row.id),
            neighborhood_id: NeighborhoodId::from_uuid(row.neighborhood_id),
            request_id: row.request_id.map(RequestId::from_uuid),
            performed_at: row.performed_at,
            data: row.data,
            performed_by: row.performed_by.map(UserId::from_uuid),
        })
        .map_err(|error| {
            AppError::Internal(format!("stored survey '{survey_id}' is invalid: {error}"))
        })
    }
}

#[async_trait]
impl SurveyRepository for PostgresSurveyRepository {
    async fn survey_exists_on(
        &self,
        neighborhood_id: NeighborhoodId,
        date: NaiveDate,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM surveys WHERE neighborhood_id = $1 AND performed_on = $2
            )
            "#,
        )
        .bind(neighborhood_id.as_uuid())
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check survey day: {error}")))
    }

    async fn insert_survey(&self, survey: &Survey) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start survey transaction: {error}"))
        })?;

        if let Some(request_id) = survey.request_id() {
            // Holds off concurrent transitions until the survey is committed.
            let query = format!("{SELECT_REQUESTS} WHERE id = $1 FOR SHARE");
            let request = sqlx::query_as::<_, RequestRow>(query.as_str())
                .bind(request_id.as_uuid())
                .fetch_optional(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to lock survey request: {error}"))
                })?
                .map(SurveyRequest::try_from)
                .transpose()?
                .ok_or_else(|| {
                    AppError::NotFound(format!("request '{request_id}' does not exist"))
                })?;
            ensure_request_accepts_survey(&request, survey.neighborhood_id())?;
        }

        sqlx::query(
            r#"
            INSERT INTO surveys
                (id, neighborhood_id, request_id, performed_at, performed_on, data, performed_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(survey.id().as_uuid())
        .bind(survey.neighborhood_id().as_uuid())
        .bind(survey.request_id().map(|value| value.as_uuid()))
        .bind(survey.performed_at())
        .bind(survey.performed_on())
        .bind(survey.data())
        .bind(survey.performed_by().map(|value| value.as_uuid()))
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!(
                    "neighborhood '{}' already has a survey on {}",
                    survey.neighborhood_id(),
                    survey.performed_on()
                ));
            }
            AppError::Internal(format!("failed to insert survey: {error}"))
        })?;

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit survey: {error}")))
    }

    async fn find_survey(&self, survey_id: SurveyId) -> AppResult<Option<Survey>> {
        sqlx::query_as::<_, SurveyRow>(
            r#"
            SELECT id, neighborhood_id, request_id, performed_at, data, performed_by
            FROM surveys
            WHERE id = $1
            "#,
        )
        .bind(survey_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find survey: {error}")))?
        .map(Survey::try_from)
        .transpose()
    }

    async fn list_surveys(&self, neighborhood_id: Option<NeighborhoodId>) -> AppResult<Vec<Survey>> {
        sqlx::query_as::<_, SurveyRow>(
            r#"
            SELECT id, neighborhood_id, request_id, performed_at, data, performed_by
            FROM surveys
            WHERE ($1::uuid IS NULL OR neighborhood_id = $1)
            ORDER BY performed_at DESC, id
            "#,
        )
        .bind(neighborhood_id.map(|value| value.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list surveys: {error}")))?
        .into_iter()
        .map(Survey::try_from)
        .collect()
    }
}
