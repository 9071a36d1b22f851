use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

mod conversions;

/// Incoming payload for opening a survey request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-request-payload.ts"
)]
pub struct CreateRequestPayload {
    pub neighborhood_id: Uuid,
    /// `new` or `update`.
    pub kind: String,
    #[serde(default)]
    pub notes: String,
}

/// Incoming payload for moving a request to another state.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/transition-request-payload.ts"
)]
pub struct TransitionRequestPayload {
    pub target: String,
    #[serde(default)]
    pub comment: String,
}

/// Incoming payload for replacing request notes.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-request-notes-payload.ts"
)]
pub struct UpdateRequestNotesPayload {
    pub notes: String,
}

/// Query string of the request listing.
#[derive(Debug, Default, Deserialize)]
pub struct RequestListParams {
    pub state: Option<String>,
    pub neighborhood_id: Option<Uuid>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// API representation of a survey request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/survey-request-response.ts"
)]
pub struct SurveyRequestResponse {
    pub request_id: String,
    pub neighborhood_id: String,
    pub kind: String,
    pub state: String,
    pub is_open: bool,
    /// States the request may move to next.
    pub allowed_targets: Vec<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub notes: String,
}

/// API representation of one audit row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/request-audit-entry-response.ts"
)]
pub struct RequestAuditEntryResponse {
    pub audit_id: String,
    pub request_id: String,
    /// Absent on the creation row.
    pub previous_state: Option<String>,
    pub next_state: String,
    pub changed_by: Option<String>,
    pub changed_at: String,
    pub comment: String,
}
