use super::*;

pub async fn list_departments_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .geography_service
        .list_departments()
        .await?
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(departments))
}

pub async fn get_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<Uuid>,
) -> ApiResult<Json<DepartmentResponse>> {
    let department = state
        .geography_service
        .get_department(DepartmentId::from_uuid(department_id))
        .await?;

    Ok(Json(DepartmentResponse::from(department)))
}

pub async fn create_department_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveDepartmentRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentResponse>)> {
    let department = state
        .geography_service
        .create_department(&user, payload.name.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(DepartmentResponse::from(department))))
}

pub async fn rename_department_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(department_id): Path<Uuid>,
    Json(payload): Json<SaveDepartmentRequest>,
) -> ApiResult<Json<DepartmentResponse>> {
    let department = state
        .geography_service
        .rename_department(
            &user,
            DepartmentId::from_uuid(department_id),
            payload.name.as_str(),
        )
        .await?;

    Ok(Json(DepartmentResponse::from(department)))
}

pub async fn delete_department_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(department_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .geography_service
        .delete_department(&user, DepartmentId::from_uuid(department_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
