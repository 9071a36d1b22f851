//! PostgreSQL-backed survey request repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use relevar_application::{RequestListQuery, RequestRepository};
use relevar_core::{AppError, AppResult};
use relevar_domain::{
    NeighborhoodId, RequestAuditEntry, RequestAuditId, RequestId, RequestKind, RequestState,
    RequestTransition, SurveyRequest, SurveyRequestParts, UserId,
};

use crate::postgres_codes::is_unique_violation;

/// PostgreSQL implementation of the request repository port.
#[derive(Clone)]
pub struct PostgresRequestRepository {
    pool: PgPool,
}

impl PostgresRequestRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RequestRow {
    id: Uuid,
    neighborhood_id: Uuid,
    kind: String,
    state: String,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    notes: String,
}

impl TryFrom<RequestRow> for SurveyRequest {
    type Error = AppError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        Ok(SurveyRequest::from_parts(SurveyRequestParts {
            id: RequestId::from_uuid(row.id),
            neighborhood_id: NeighborhoodId::from_uuid(row.neighborhood_id),
            kind: row.kind.parse::<RequestKind>()?,
            state: row.state.parse::<RequestState>()?,
            created_by: row.created_by.map(UserId::from_uuid),
            created_at: row.created_at,
            updated_at: row.updated_at,
            notes: row.notes,
        }))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    request_id: Uuid,
    previous_state: String,
    next_state: String,
    changed_by: Option<Uuid>,
    changed_at: DateTime<Utc>,
    comment: String,
}

impl TryFrom<AuditRow> for RequestAuditEntry {
    type Error = AppError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RequestAuditId::from_uuid(row.id),
            request_id: RequestId::from_uuid(row.request_id),
            previous: RequestAuditEntry::parse_previous(row.previous_state.as_str())?,
            next: row.next_state.parse::<RequestState>()?,
            changed_by: row.changed_by.map(UserId::from_uuid),
            changed_at: row.changed_at,
            comment: row.comment,
        })
    }
}

pub(crate) const SELECT_REQUESTS: &str = r#"
    SELECT id, neighborhood_id, kind, state, created_by, created_at, updated_at, notes
    FROM survey_requests
"#;

fn open_request_conflict(request_kind: RequestKind) -> AppError {
    AppError::Conflict(format!(
        "the neighborhood already has an open '{}' request",
        request_kind.as_str()
    ))
}

async fn append_audit(
    transaction: &mut Transaction<'static, Postgres>,
    audit: &RequestAuditEntry,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO survey_request_audit
            (id, request_id, previous_state, next_state, changed_by, changed_at, comment)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(audit.id.as_uuid())
    .bind(audit.request_id.as_uuid())
    .bind(audit.previous_label())
    .bind(audit.next.as_str())
    .bind(audit.changed_by.map(|value| value.as_uuid()))
    .bind(audit.changed_at)
    .bind(audit.comment.as_str())
    .execute(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to append request audit: {error}")))?;

    Ok(())
}

#[async_trait]
impl RequestRepository for PostgresRequestRepository {
    async fn find_open_request(
        &self,
        neighborhood_id: NeighborhoodId,
        kind: RequestKind,
    ) -> AppResult<Option<SurveyRequest>> {
        let query = format!(
            "{SELECT_REQUESTS} WHERE neighborhood_id = $1 AND kind = $2 AND state <> 'inactive'"
        );

        sqlx::query_as::<_, RequestRow>(query.as_str())
            .bind(neighborhood_id.as_uuid())
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find open request: {error}")))?
            .map(SurveyRequest::try_from)
            .transpose()
    }

    async fn create_request(
        &self,
        request: &SurveyRequest,
        audit: &RequestAuditEntry,
    ) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start request transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO survey_requests
                (id, neighborhood_id, kind, state, created_by, created_at, updated_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(request.id().as_uuid())
        .bind(request.neighborhood_id().as_uuid())
        .bind(request.kind().as_str())
        .bind(request.state().as_str())
        .bind(request.created_by().map(|value| value.as_uuid()))
        .bind(request.created_at())
        .bind(request.updated_at())
        .bind(request.notes())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return open_request_conflict(request.kind());
            }
            AppError::Internal(format!("failed to insert request: {error}"))
        })?;

        append_audit(&mut transaction, audit).await?;

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit request: {error}")))
    }

    async fn find_request(&self, request_id: RequestId) -> AppResult<Option<SurveyRequest>> {
        let query = format!("{SELECT_REQUESTS} WHERE id = $1");

        sqlx::query_as::<_, RequestRow>(query.as_str())
            .bind(request_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find request: {error}")))?
            .map(SurveyRequest::try_from)
            .transpose()
    }

    async fn list_requests(&self, query: RequestListQuery) -> AppResult<Vec<SurveyRequest>> {
        let sql = format!(
            r#"
            {SELECT_REQUESTS}
            WHERE ($1::text IS NULL OR state = $1)
              AND ($2::uuid IS NULL OR neighborhood_id = $2)
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#
        );

        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

        sqlx::query_as::<_, RequestRow>(sql.as_str())
            .bind(query.state.map(|state| state.as_str()))
            .bind(query.neighborhood_id.map(|value| value.as_uuid()))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list requests: {error}")))?
            .into_iter()
            .map(SurveyRequest::try_from)
            .collect()
    }

    async fn save_transition(
        &self,
        transition: &RequestTransition,
        audit: &RequestAuditEntry,
    ) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start transition transaction: {error}"))
        })?;

        let updated = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE survey_requests
            SET state = $3, updated_at = $4
            WHERE id = $1 AND state = $2
            RETURNING kind
            "#,
        )
        .bind(transition.request_id.as_uuid())
        .bind(transition.previous.as_str())
        .bind(transition.next.as_str())
        .bind(transition.changed_at)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!(
                    "request '{}' cannot be reopened while another request of its kind is open",
                    transition.request_id
                ));
            }
            AppError::Internal(format!("failed to update request state: {error}"))
        })?;

        if updated.is_none() {
            return Err(AppError::Conflict(format!(
                "request '{}' is no longer in state '{}'",
                transition.request_id,
                transition.previous.as_str()
            )));
        }

        append_audit(&mut transaction, audit).await?;

        transaction
            .commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit transition: {error}")))
    }

    async fn update_notes(
        &self,
        request_id: RequestId,
        notes: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE survey_requests SET notes = $2, updated_at = $3 WHERE id = $1")
            .bind(request_id.as_uuid())
            .bind(notes)
            .bind(updated_at)
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to update notes: {error}")))?;

        Ok(())
    }

    async fn list_audit(&self, request_id: RequestId) -> AppResult<Vec<RequestAuditEntry>> {
        sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT id, request_id, previous_state, next_state, changed_by, changed_at, comment
            FROM survey_request_audit
            WHERE request_id = $1
            ORDER BY changed_at, id
            "#,
        )
        .bind(request_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list request audit: {error}")))?
        .into_iter()
        .map(RequestAuditEntry::try_from)
        .collect()
    }
}

#[cfg(test)]
mod tests;
