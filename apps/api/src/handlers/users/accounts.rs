use super::*;

/// Public self-registration. The account waits for approval.
pub async fn register_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let account = state.user_service.register_user(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(account))))
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let status = query
        .status
        .as_deref()
        .map(AccountStatus::from_str)
        .transpose()?;
    let users = state
        .user_service
        .list_users(&user, status)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let role_id = payload.role_id.map(RoleId::from_uuid);
    let (input, status) = payload.into_input()?;
    let account = state
        .user_service
        .create_user(&user, input, role_id, status)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(account))))
}

/// Returns the caller's own account.
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserResponse>> {
    let account = state
        .user_service
        .get_user(&user, UserId::from_uuid(user.user_id()))
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let account = state
        .user_service
        .update_profile(&user, payload.into())
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let account = state
        .user_service
        .get_user(&user, UserId::from_uuid(user_id))
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn update_user_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> ApiResult<Json<UserResponse>> {
    let status = AccountStatus::from_str(payload.status.as_str())?;
    let account = state
        .user_service
        .change_user_status(&user, UserId::from_uuid(user_id), status)
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn assign_user_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AssignUserRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    let account = state
        .user_service
        .assign_role(
            &user,
            UserId::from_uuid(user_id),
            RoleId::from_uuid(payload.role_id),
        )
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn effective_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<EffectiveRoleResponse>> {
    let user_id = UserId::from_uuid(user_id);
    // Reading the account enforces the same visibility rules.
    state.user_service.get_user(&user, user_id).await?;
    let role = state.user_service.effective_role(user_id).await?;

    Ok(Json(EffectiveRoleResponse::from(role)))
}
