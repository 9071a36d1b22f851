use super::*;

pub async fn list_districts_handler(
    State(state): State<AppState>,
    Query(query): Query<DistrictListQuery>,
) -> ApiResult<Json<Vec<DistrictResponse>>> {
    let districts = state
        .geography_service
        .list_districts(query.department_id.map(DepartmentId::from_uuid))
        .await?
        .into_iter()
        .map(DistrictResponse::from)
        .collect();

    Ok(Json(districts))
}

pub async fn get_district_handler(
    State(state): State<AppState>,
    Path(district_id): Path<Uuid>,
) -> ApiResult<Json<DistrictResponse>> {
    let district = state
        .geography_service
        .get_district(DistrictId::from_uuid(district_id))
        .await?;

    Ok(Json(DistrictResponse::from(district)))
}

pub async fn create_district_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveDistrictRequest>,
) -> ApiResult<(StatusCode, Json<DistrictResponse>)> {
    let district = state
        .geography_service
        .create_district(&user, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(DistrictResponse::from(district))))
}

pub async fn update_district_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(district_id): Path<Uuid>,
    Json(payload): Json<SaveDistrictRequest>,
) -> ApiResult<Json<DistrictResponse>> {
    let district = state
        .geography_service
        .update_district(&user, DistrictId::from_uuid(district_id), payload.into())
        .await?;

    Ok(Json(DistrictResponse::from(district)))
}

pub async fn delete_district_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(district_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .geography_service
        .delete_district(&user, DistrictId::from_uuid(district_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
