use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use relevar_core::UserIdentity;
use relevar_domain::RequestId;
use uuid::Uuid;

use crate::dto::{
    CreateRequestPayload, RequestAuditEntryResponse, RequestListParams, SurveyRequestResponse,
    TransitionRequestPayload, UpdateRequestNotesPayload,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_requests_handler(
    State(state): State<AppState>,
    Query(params): Query<RequestListParams>,
) -> ApiResult<Json<Vec<SurveyRequestResponse>>> {
    let requests = state
        .request_service
        .list_requests(params.try_into()?)
        .await?
        .into_iter()
        .map(SurveyRequestResponse::from)
        .collect();

    Ok(Json(requests))
}

pub async fn get_request_handler(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<Json<SurveyRequestResponse>> {
    let request = state
        .request_service
        .get_request(RequestId::from_uuid(request_id))
        .await?;

    Ok(Json(SurveyRequestResponse::from(request)))
}

pub async fn create_request_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateRequestPayload>,
) -> ApiResult<(StatusCode, Json<SurveyRequestResponse>)> {
    let request = state
        .request_service
        .create_request(&user, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(SurveyRequestResponse::from(request))))
}

pub async fn transition_request_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<TransitionRequestPayload>,
) -> ApiResult<Json<SurveyRequestResponse>> {
    let request = state
        .request_service
        .transition_request(
            &user,
            RequestId::from_uuid(request_id),
            payload.try_into()?,
        )
        .await?;

    Ok(Json(SurveyRequestResponse::from(request)))
}

pub async fn update_request_notes_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<UpdateRequestNotesPayload>,
) -> ApiResult<Json<SurveyRequestResponse>> {
    let request = state
        .request_service
        .update_request_notes(
            &user,
            RequestId::from_uuid(request_id),
            payload.notes.as_str(),
        )
        .await?;

    Ok(Json(SurveyRequestResponse::from(request)))
}

pub async fn list_request_audit_handler(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<Json<Vec<RequestAuditEntryResponse>>> {
    let entries = state
        .request_service
        .list_request_audit(RequestId::from_uuid(request_id))
        .await?
        .into_iter()
        .map(RequestAuditEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

#[cfg(test)]
mod tests;
