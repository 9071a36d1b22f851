use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use relevar_application::DEFAULT_NOTIFICATION_LIMIT;
use relevar_core::UserIdentity;
use relevar_domain::NotificationId;
use uuid::Uuid;

use crate::dto::{
    AffectedRowsResponse, DeleteSelectedNotificationsRequest, NotificationListQuery,
    NotificationResponse, UnreadCountResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<NotificationListQuery>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let notifications = state
        .notification_service
        .list(&user, query.limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT))
        .await?
        .into_iter()
        .map(NotificationResponse::from)
        .collect();

    Ok(Json(notifications))
}

pub async fn unread_count_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UnreadCountResponse>> {
    let unread = state.notification_service.unread_count(&user).await?;

    Ok(Json(UnreadCountResponse { unread }))
}

pub async fn mark_all_read_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<AffectedRowsResponse>> {
    let affected = state.notification_service.mark_all_read(&user).await?;

    Ok(Json(AffectedRowsResponse { affected }))
}

pub async fn delete_notification_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .notification_service
        .delete(&user, NotificationId::from_uuid(notification_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_selected_notifications_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<DeleteSelectedNotificationsRequest>,
) -> ApiResult<Json<AffectedRowsResponse>> {
    let notification_ids: Vec<NotificationId> = payload
        .notification_ids
        .into_iter()
        .map(NotificationId::from_uuid)
        .collect();
    let affected = state
        .notification_service
        .delete_selected(&user, &notification_ids)
        .await?;

    Ok(Json(AffectedRowsResponse { affected }))
}

pub async fn delete_all_notifications_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<AffectedRowsResponse>> {
    let affected = state.notification_service.delete_all(&user).await?;

    Ok(Json(AffectedRowsResponse { affected }))
}
