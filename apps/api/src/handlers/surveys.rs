use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use relevar_core::UserIdentity;
use relevar_domain::{NeighborhoodId, SurveyId};
use uuid::Uuid;

use crate::dto::{RecordSurveyRequest, SurveyListQuery, SurveyResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_surveys_handler(
    State(state): State<AppState>,
    Query(query): Query<SurveyListQuery>,
) -> ApiResult<Json<Vec<SurveyResponse>>> {
    let surveys = state
        .survey_service
        .list_surveys(query.neighborhood_id.map(NeighborhoodId::from_uuid))
        .await?
        .into_iter()
        .map(SurveyResponse::from)
        .collect();

    Ok(Json(surveys))
}

pub async fn get_survey_handler(
    State(state): State<AppState>,
    Path(survey_id): Path<Uuid>,
) -> ApiResult<Json<SurveyResponse>> {
    let survey = state
        .survey_service
        .get_survey(SurveyId::from_uuid(survey_id))
        .await?;

    Ok(Json(SurveyResponse::from(survey)))
}

pub async fn record_survey_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<RecordSurveyRequest>,
) -> ApiResult<(StatusCode, Json<SurveyResponse>)> {
    let survey = state
        .survey_service
        .record_survey(&user, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(SurveyResponse::from(survey))))
}
