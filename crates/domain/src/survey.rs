use chrono::{DateTime, NaiveDate, Utc};
use relevar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{NeighborhoodId, RequestId, RequestState, SurveyId, SurveyRequest, UserId};

/// Stored attributes of a survey, used to build or restore one.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyParts {
    /// Survey identifier.
    pub id: SurveyId,
    /// Surveyed neighborhood.
    pub neighborhood_id: NeighborhoodId,
    /// Authorizing request, when any.
    pub request_id: Option<RequestId>,
    /// Moment the survey was taken.
    pub performed_at: DateTime<Utc>,
    /// Collected field values.
    pub data: Value,
    /// Surveyor, cleared when the account is removed.
    pub performed_by: Option<UserId>,
}

/// Recorded outcome of visiting a neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    id: SurveyId,
    neighborhood_id: NeighborhoodId,
    request_id: Option<RequestId>,
    performed_at: DateTime<Utc>,
    data: Value,
    performed_by: Option<UserId>,
}

impl Survey {
    /// Creates a survey; collected data must be a JSON object.
    pub fn new(parts: SurveyParts) -> AppResult<Self> {
        if !parts.data.is_object() {
            return Err(AppError::Validation(
                "survey data must be a JSON object".to_owned(),
            ));
        }

        Ok(Self {
            id: parts.id,
            neighborhood_id: parts.neighborhood_id,
            request_id: parts.request_id,
            performed_at: parts.performed_at,
            data: parts.data,
            performed_by: parts.performed_by,
        })
    }

    /// Returns the survey identifier.
    #[must_use]
    pub fn id(&self) -> SurveyId {
        self.id
    }

    /// Returns the surveyed neighborhood.
    #[must_use]
    pub fn neighborhood_id(&self) -> NeighborhoodId {
        self.neighborhood_id
    }

    /// Returns the authorizing request, when any.
    #[must_use]
    pub fn request_id(&self) -> Option<RequestId> {
        self.request_id
    }

    /// Returns the survey timestamp.
    #[must_use]
    pub fn performed_at(&self) -> DateTime<Utc> {
        self.performed_at
    }

    /// UTC calendar date used for the one-survey-per-day rule.
    #[must_use]
    pub fn performed_on(&self) -> NaiveDate {
        self.performed_at.date_naive()
    }

    /// Returns the collected data.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the surveyor, if still known.
    #[must_use]
    pub fn performed_by(&self) -> Option<UserId> {
        self.performed_by
    }
}

/// Ensures a survey of `neighborhood_id` may be attached to `request`.
pub fn ensure_request_accepts_survey(
    request: &SurveyRequest,
    neighborhood_id: NeighborhoodId,
) -> AppResult<()> {
    if request.neighborhood_id() != neighborhood_id {
        return Err(AppError::Validation(format!(
            "request '{}' targets a different neighborhood",
            request.id()
        )));
    }

    if request.state() != RequestState::InProgress {
        return Err(AppError::Validation(format!(
            "request '{}' must be '{}' to accept a survey, found '{}'",
            request.id(),
            RequestState::InProgress.as_str(),
            request.state().as_str()
        )));
    }

    Ok(())
}
