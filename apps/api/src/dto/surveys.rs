use chrono::{DateTime, Utc};
use relevar_application::RecordSurveyInput;
use relevar_domain::{NeighborhoodId, RequestId, Survey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

/// Incoming payload for recording a survey.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/record-survey-request.ts"
)]
pub struct RecordSurveyRequest {
    pub neighborhood_id: Uuid,
    #[serde(default)]
    pub request_id: Option<Uuid>,
    /// Defaults to the time the survey is recorded.
    #[serde(default)]
    pub performed_at: Option<DateTime<Utc>>,
    #[ts(type = "Record<string, unknown>")]
    pub data: Value,
}

/// Query string of the survey listing.
#[derive(Debug, Default, Deserialize)]
pub struct SurveyListQuery {
    pub neighborhood_id: Option<Uuid>,
}

/// API representation of a survey.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/survey-response.ts"
)]
pub struct SurveyResponse {
    pub survey_id: String,
    pub neighborhood_id: String,
    pub request_id: Option<String>,
    pub performed_at: String,
    /// UTC calendar date the one-per-day rule is keyed on.
    pub performed_on: String,
    #[ts(type = "Record<string, unknown>")]
    pub data: Value,
    pub performed_by: Option<String>,
}

impl From<RecordSurveyRequest> for RecordSurveyInput {
    fn from(value: RecordSurveyRequest) -> Self {
        Self {
            neighborhood_id: NeighborhoodId::from_uuid(value.neighborhood_id),
            request_id: value.request_id.map(RequestId::from_uuid),
            performed_at: value.performed_at,
            data: value.data,
        }
    }
}

impl From<Survey> for SurveyResponse {
    fn from(value: Survey) -> Self {
        Self {
            survey_id: value.id().to_string(),
            neighborhood_id: value.neighborhood_id().to_string(),
            request_id: value.request_id().map(|request_id| request_id.to_string()),
            performed_at: value.performed_at().to_rfc3339(),
            performed_on: value.performed_on().to_string(),
            data: value.data().clone(),
            performed_by: value.performed_by().map(|user_id| user_id.to_string()),
        }
    }
}
