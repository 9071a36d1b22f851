use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use relevar_core::UserIdentity;
use relevar_domain::{AreaId, ObjectiveId};
use uuid::Uuid;

use crate::dto::{AreaResponse, CreateAreaRequest, CreateObjectiveRequest, ObjectiveResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_areas_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AreaResponse>>> {
    let areas = state
        .area_service
        .list_areas()
        .await?
        .into_iter()
        .map(AreaResponse::from)
        .collect();

    Ok(Json(areas))
}

pub async fn get_area_handler(
    State(state): State<AppState>,
    Path(area_id): Path<Uuid>,
) -> ApiResult<Json<AreaResponse>> {
    let area = state
        .area_service
        .get_area(AreaId::from_uuid(area_id))
        .await?;

    Ok(Json(AreaResponse::from(area)))
}

pub async fn create_area_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateAreaRequest>,
) -> ApiResult<(StatusCode, Json<AreaResponse>)> {
    let area = state
        .area_service
        .create_area(&user, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(AreaResponse::from(area))))
}

pub async fn delete_area_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(area_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .area_service
        .delete_area(&user, AreaId::from_uuid(area_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_objectives_handler(
    State(state): State<AppState>,
    Path(area_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ObjectiveResponse>>> {
    let objectives = state
        .area_service
        .list_objectives(AreaId::from_uuid(area_id))
        .await?
        .into_iter()
        .map(ObjectiveResponse::from)
        .collect();

    Ok(Json(objectives))
}

pub async fn create_objective_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(area_id): Path<Uuid>,
    Json(payload): Json<CreateObjectiveRequest>,
) -> ApiResult<(StatusCode, Json<ObjectiveResponse>)> {
    let objective = state
        .area_service
        .create_objective(&user, AreaId::from_uuid(area_id), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ObjectiveResponse::from(objective))))
}

pub async fn delete_objective_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(objective_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .area_service
        .delete_objective(&user, ObjectiveId::from_uuid(objective_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
