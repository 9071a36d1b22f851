use relevar_core::AppError;

use super::*;
use crate::dto::NotificationListQuery;
use crate::error::ApiError;
use crate::handlers::notifications::{list_notifications_handler, unread_count_handler};
use crate::state::test_support::{in_memory_state, member, superuser};

fn role_payload(name: &str, permissions: &[&str]) -> SaveRoleRequest {
    SaveRoleRequest {
        name: name.to_owned(),
        description: String::new(),
        color: None,
        permissions: permissions.iter().map(|name| (*name).to_owned()).collect(),
    }
}

fn registration(username: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        username: username.to_owned(),
        email: Some("maria@example.org".to_owned()),
        national_id: Some("12345678".to_owned()),
        phone: None,
    }
}

#[tokio::test]
async fn registration_waits_for_approval_and_notifies_admins() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;

    let registered =
        register_user_handler(State(state.clone()), Json(registration("maria"))).await;
    assert!(registered.is_ok());
    let Ok((status, Json(account))) = registered else {
        return;
    };
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(account.status, "pending");
    assert_eq!(account.origin, "self_registered");

    // Pending accounts cannot act yet.
    let user_id = Uuid::parse_str(&account.user_id).unwrap_or_default();
    let acting = state
        .user_service
        .resolve_identity(UserId::from_uuid(user_id))
        .await;
    assert!(matches!(acting, Err(AppError::Forbidden(_))));

    let unread = unread_count_handler(State(state.clone()), Extension(admin.clone())).await;
    assert!(matches!(unread, Ok(Json(ref body)) if body.unread == 1));

    let feed = list_notifications_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Query(NotificationListQuery::default()),
    )
    .await;
    assert!(matches!(feed, Ok(Json(ref rows)) if rows.len() == 1 && rows[0].kind == "new_user"));

    let approved = update_user_status_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(user_id),
        Json(UpdateUserStatusRequest {
            status: "active".to_owned(),
        }),
    )
    .await;
    assert!(matches!(approved, Ok(Json(ref body)) if body.status == "active"));
}

#[tokio::test]
async fn roles_drive_effective_role_and_permissions() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;

    let role = create_role_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Json(SaveRoleRequest {
            name: "Surveyor".to_owned(),
            description: "Field staff".to_owned(),
            color: Some("primary".to_owned()),
            permissions: vec!["survey.record".to_owned(), "request.create".to_owned()],
        }),
    )
    .await;
    assert!(role.is_ok());
    let Ok((_, Json(role))) = role else {
        return;
    };
    let role_id = Uuid::parse_str(&role.role_id).unwrap_or_default();

    let Ok((_, Json(account))) =
        register_user_handler(State(state.clone()), Json(registration("jose"))).await
    else {
        panic!("registration failed");
    };
    let user_id = Uuid::parse_str(&account.user_id).unwrap_or_default();

    let assigned = assign_user_role_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(user_id),
        Json(AssignUserRoleRequest { role_id }),
    )
    .await;
    assert!(matches!(assigned, Ok(Json(ref body)) if body.status == "active"));

    let effective = effective_role_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(user_id),
    )
    .await;
    assert!(effective.is_ok());
    let Ok(Json(effective)) = effective else {
        return;
    };
    assert_eq!(effective.name, "Surveyor");
    assert_eq!(effective.color, "primary");
    assert!(!effective.is_implicit_administrator);
    assert_eq!(effective.permissions, vec!["request.create", "survey.record"]);

    let own = effective_role_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(admin.user_id()),
    )
    .await;
    assert!(
        matches!(own, Ok(Json(ref body)) if body.is_implicit_administrator && body.name == "administrator")
    );
}

#[tokio::test]
async fn unknown_permission_in_role_payload_is_rejected() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;

    let role = create_role_handler(
        State(state.clone()),
        Extension(admin),
        Json(SaveRoleRequest {
            name: "Broken".to_owned(),
            description: String::new(),
            color: None,
            permissions: vec!["everything".to_owned()],
        }),
    )
    .await;
    assert!(matches!(role, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn administrators_cannot_create_pending_accounts() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;

    let created = create_user_handler(
        State(state.clone()),
        Extension(admin),
        Json(CreateUserRequest {
            username: "ana".to_owned(),
            email: None,
            national_id: None,
            phone: None,
            role_id: None,
            status: Some("pending".to_owned()),
        }),
    )
    .await;
    assert!(matches!(created, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn role_still_assigned_to_a_user_cannot_be_deleted() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;

    let Ok((_, Json(role))) = create_role_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Json(role_payload("Surveyor", &["survey.record"])),
    )
    .await
    else {
        panic!("role was not created");
    };
    let role_id = Uuid::parse_str(&role.role_id).unwrap_or_default();

    let Ok((_, Json(account))) = create_user_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Json(CreateUserRequest {
            username: "ana".to_owned(),
            email: None,
            national_id: None,
            phone: None,
            role_id: Some(role_id),
            status: None,
        }),
    )
    .await
    else {
        panic!("user was not created");
    };
    let user_id = Uuid::parse_str(&account.user_id).unwrap_or_default();

    let deleted = delete_role_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(role_id),
    )
    .await;
    assert!(matches!(deleted, Err(ApiError(AppError::Conflict(_)))));

    let stored = get_user_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(user_id),
    )
    .await;
    assert!(matches!(
        stored,
        Ok(Json(ref body)) if body.role_id.as_deref() == Some(role.role_id.as_str())
    ));
}

#[tokio::test]
async fn editing_a_role_changes_what_its_holders_may_do() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;
    let staff = member(&state, &admin, "ana").await;

    let Ok((_, Json(role))) = create_role_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Json(role_payload("Surveyor", &["survey.record"])),
    )
    .await
    else {
        panic!("role was not created");
    };
    let role_id = Uuid::parse_str(&role.role_id).unwrap_or_default();

    let assigned = assign_user_role_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(staff.user_id()),
        Json(AssignUserRoleRequest { role_id }),
    )
    .await;
    assert!(assigned.is_ok());

    let updated = update_role_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(role_id),
        Json(role_payload("Field team", &["survey.record", "request.create"])),
    )
    .await;
    assert!(matches!(
        updated,
        Ok(Json(ref body)) if body.name == "Field team" && body.role_id == role.role_id
    ));

    let effective = effective_role_handler(
        State(state.clone()),
        Extension(staff.clone()),
        Path(staff.user_id()),
    )
    .await;
    assert!(matches!(
        effective,
        Ok(Json(ref body)) if body.name == "Field team"
            && body.permissions == vec!["request.create", "survey.record"]
    ));

    let denied = update_role_handler(
        State(state.clone()),
        Extension(staff),
        Path(role_id),
        Json(role_payload("Everything", &["role.assign"])),
    )
    .await;
    assert!(matches!(denied, Err(ApiError(AppError::Forbidden(_)))));
}

#[tokio::test]
async fn users_edit_their_own_profile() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;
    let staff = member(&state, &admin, "ana").await;

    let updated = update_profile_handler(
        State(state.clone()),
        Extension(staff.clone()),
        Json(UpdateProfileRequest {
            email: Some("ana@municipio.gov".to_owned()),
            national_id: Some("7654321".to_owned()),
            phone: Some("0981000000".to_owned()),
        }),
    )
    .await;
    assert!(matches!(
        updated,
        Ok(Json(ref body)) if body.username == "ana" && body.phone.as_deref() == Some("0981000000")
    ));

    let invalid = update_profile_handler(
        State(state.clone()),
        Extension(staff.clone()),
        Json(UpdateProfileRequest {
            national_id: Some("12".to_owned()),
            ..UpdateProfileRequest::default()
        }),
    )
    .await;
    assert!(matches!(invalid, Err(ApiError(AppError::Validation(_)))));

    let profile = get_profile_handler(State(state.clone()), Extension(staff)).await;
    assert!(matches!(
        profile,
        Ok(Json(ref body)) if body.email.as_deref() == Some("ana@municipio.gov")
            && body.national_id.as_deref() == Some("7654321")
    ));
}
