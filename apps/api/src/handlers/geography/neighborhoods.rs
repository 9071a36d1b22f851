use super::*;

pub async fn list_neighborhoods_handler(
    State(state): State<AppState>,
    Query(query): Query<NeighborhoodListQuery>,
) -> ApiResult<Json<Vec<NeighborhoodResponse>>> {
    let neighborhoods = state
        .geography_service
        .list_neighborhoods(query.try_into()?)
        .await?
        .into_iter()
        .map(NeighborhoodResponse::from)
        .collect();

    Ok(Json(neighborhoods))
}

pub async fn get_neighborhood_handler(
    State(state): State<AppState>,
    Path(neighborhood_id): Path<Uuid>,
) -> ApiResult<Json<NeighborhoodResponse>> {
    let neighborhood = state
        .geography_service
        .get_neighborhood(NeighborhoodId::from_uuid(neighborhood_id))
        .await?;

    Ok(Json(NeighborhoodResponse::from(neighborhood)))
}

pub async fn create_neighborhood_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveNeighborhoodRequest>,
) -> ApiResult<(StatusCode, Json<NeighborhoodResponse>)> {
    let neighborhood = state
        .geography_service
        .create_neighborhood(&user, payload.try_into()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NeighborhoodResponse::from(neighborhood)),
    ))
}

pub async fn update_neighborhood_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(neighborhood_id): Path<Uuid>,
    Json(payload): Json<SaveNeighborhoodRequest>,
) -> ApiResult<Json<NeighborhoodResponse>> {
    let neighborhood = state
        .geography_service
        .update_neighborhood(
            &user,
            NeighborhoodId::from_uuid(neighborhood_id),
            payload.try_into()?,
        )
        .await?;

    Ok(Json(NeighborhoodResponse::from(neighborhood)))
}

pub async fn delete_neighborhood_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(neighborhood_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .geography_service
        .delete_neighborhood(&user, NeighborhoodId::from_uuid(neighborhood_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
