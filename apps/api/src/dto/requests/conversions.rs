use std::str::FromStr;

use relevar_application::{CreateRequestInput, RequestListQuery, TransitionRequestInput};
use relevar_core::AppError;
use relevar_domain::{NeighborhoodId, RequestAuditEntry, RequestKind, RequestState, SurveyRequest};

use super::{
    CreateRequestPayload, RequestAuditEntryResponse, RequestListParams, SurveyRequestResponse,
    TransitionRequestPayload,
};

impl TryFrom<CreateRequestPayload> for CreateRequestInput {
    type Error = AppError;

    fn try_from(value: CreateRequestPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            neighborhood_id: NeighborhoodId::from_uuid(value.neighborhood_id),
            kind: RequestKind::from_str(value.kind.as_str())?,
            notes: value.notes,
        })
    }
}

impl TryFrom<TransitionRequestPayload> for TransitionRequestInput {
    type Error = AppError;

    fn try_from(value: TransitionRequestPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            target: RequestState::from_str(value.target.as_str())?,
            comment: value.comment,
        })
    }
}

impl TryFrom<RequestListParams> for RequestListQuery {
    type Error = AppError;

    fn try_from(value: RequestListParams) -> Result<Self, Self::Error> {
        let defaults = Self::default();

        Ok(Self {
            state: value
                .state
                .as_deref()
                .map(RequestState::from_str)
                .transpose()?,
            neighborhood_id: value.neighborhood_id.map(NeighborhoodId::from_uuid),
            limit: value.limit.unwrap_or(defaults.limit),
            offset: value.offset.unwrap_or(defaults.offset),
        })
    }
}

impl From<SurveyRequest> for SurveyRequestResponse {
    fn from(value: SurveyRequest) -> Self {
        let state = value.state();

        Self {
            request_id: value.id().to_string(),
            neighborhood_id: value.neighborhood_id().to_string(),
            kind: value.kind().as_str().to_owned(),
            state: state.as_str().to_owned(),
            is_open: state.is_open(),
            allowed_targets: state
                .allowed_targets()
                .iter()
                .map(|target| target.as_str().to_owned())
                .collect(),
            created_by: value.created_by().map(|user_id| user_id.to_string()),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
            notes: value.notes().to_owned(),
        }
    }
}

impl From<RequestAuditEntry> for RequestAuditEntryResponse {
    fn from(value: RequestAuditEntry) -> Self {
        Self {
            audit_id: value.id.to_string(),
            request_id: value.request_id.to_string(),
            previous_state: value.previous.map(|state| state.as_str().to_owned()),
            next_state: value.next.as_str().to_owned(),
            changed_by: value.changed_by.map(|user_id| user_id.to_string()),
            changed_at: value.changed_at.to_rfc3339(),
            comment: value.comment,
        }
    }
}
