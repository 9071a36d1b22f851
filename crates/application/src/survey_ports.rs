use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use relevar_core::AppResult;
use relevar_domain::{NeighborhoodId, RequestId, Survey, SurveyId};

/// Input payload for recording a survey.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSurveyInput {
    /// Surveyed neighborhood.
    pub neighborhood_id: NeighborhoodId,
    /// Authorizing request, when the survey answers one.
    pub request_id: Option<RequestId>,
    /// Survey timestamp. Defaults to now.
    pub performed_at: Option<DateTime<Utc>>,
    /// Collected field values.
    pub data: Value,
}

/// Repository port for surveys.
#[async_trait]
pub trait SurveyRepository: Send + Sync {
    /// Returns whether the neighborhood already has a survey on `date`.
    async fn survey_exists_on(
        &self,
        neighborhood_id: NeighborhoodId,
        date: NaiveDate,
    ) -> AppResult<bool>;

    /// Inserts a survey.
    ///
    /// The linked request is re-checked in the same unit of work as the
    /// insert: `AppError::NotFound` when it is gone, `AppError::Validation`
    /// when it no longer accepts the survey. Returns `AppError::Conflict` when
    /// the neighborhood already has a survey on the same calendar date.
    async fn insert_survey(&self, survey: &Survey) -> AppResult<()>;

    /// Finds one survey.
    async fn find_survey(&self, survey_id: SurveyId) -> AppResult<Option<Survey>>;

    /// Lists surveys newest first.
    async fn list_surveys(&self, neighborhood_id: Option<NeighborhoodId>) -> AppResult<Vec<Survey>>;
}
