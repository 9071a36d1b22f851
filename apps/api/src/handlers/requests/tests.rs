use axum::response::IntoResponse;
use relevar_application::{CreateDistrictInput, SaveNeighborhoodInput};
use relevar_core::AppError;
use relevar_domain::NeighborhoodStatus;
use serde_json::json;

use super::*;
use crate::dto::RecordSurveyRequest;
use crate::error::ApiError;
use crate::handlers::surveys::record_survey_handler;
use crate::state::test_support::{in_memory_state, superuser};

async fn seed_neighborhood(state: &AppState, admin: &UserIdentity) -> Uuid {
    let department = state
        .geography_service
        .create_department(admin, "Central")
        .await
        .unwrap_or_else(|error| panic!("department: {error}"));
    let district = state
        .geography_service
        .create_district(
            admin,
            CreateDistrictInput {
                name: "Distrito 1".to_owned(),
                department_id: department.id(),
            },
        )
        .await
        .unwrap_or_else(|error| panic!("district: {error}"));
    let neighborhood = state
        .geography_service
        .create_neighborhood(
            admin,
            SaveNeighborhoodInput {
                name: "San Roque".to_owned(),
                status: NeighborhoodStatus::Active,
                parent_property: None,
                parent_registry: None,
                district_ids: vec![district.id()],
            },
        )
        .await
        .unwrap_or_else(|error| panic!("neighborhood: {error}"));

    neighborhood.id().as_uuid()
}

async fn open_request(
    state: &AppState,
    admin: &UserIdentity,
    neighborhood_id: Uuid,
    kind: &str,
) -> ApiResult<(StatusCode, Json<SurveyRequestResponse>)> {
    create_request_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Json(CreateRequestPayload {
            neighborhood_id,
            kind: kind.to_owned(),
            notes: "  first visit  ".to_owned(),
        }),
    )
    .await
}

async fn transition(
    state: &AppState,
    admin: &UserIdentity,
    request_id: Uuid,
    target: &str,
) -> ApiResult<Json<SurveyRequestResponse>> {
    transition_request_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(request_id),
        Json(TransitionRequestPayload {
            target: target.to_owned(),
            comment: format!("moving to {target}"),
        }),
    )
    .await
}

#[tokio::test]
async fn second_open_request_of_same_kind_is_a_conflict() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;
    let neighborhood_id = seed_neighborhood(&state, &admin).await;

    let first = open_request(&state, &admin, neighborhood_id, "new").await;
    assert!(first.is_ok());
    let Ok((status, Json(first))) = first else {
        return;
    };
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first.state, "pending");
    assert_eq!(first.notes, "first visit");
    assert_eq!(first.allowed_targets, vec!["active", "inactive"]);

    let duplicate = open_request(&state, &admin, neighborhood_id, "new").await;
    let Err(error) = duplicate else {
        panic!("second open request was accepted");
    };
    assert_eq!(error.into_response().status(), StatusCode::CONFLICT);

    let other_kind = open_request(&state, &admin, neighborhood_id, "update").await;
    assert!(other_kind.is_ok());

    let unknown_kind = open_request(&state, &admin, neighborhood_id, "renewal").await;
    assert!(matches!(unknown_kind, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn workflow_to_survey_records_audit_in_order() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;
    let neighborhood_id = seed_neighborhood(&state, &admin).await;

    let Ok((_, Json(request))) = open_request(&state, &admin, neighborhood_id, "new").await else {
        panic!("request was not opened");
    };
    let request_id = Uuid::parse_str(&request.request_id).unwrap_or_default();

    let survey_payload = || RecordSurveyRequest {
        neighborhood_id,
        request_id: Some(request_id),
        performed_at: None,
        data: json!({"households": 120}),
    };

    // Surveys need the request to be in progress.
    let early = record_survey_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Json(survey_payload()),
    )
    .await;
    assert!(matches!(early, Err(ApiError(AppError::Validation(_)))));

    assert!(transition(&state, &admin, request_id, "active").await.is_ok());
    let in_progress = transition(&state, &admin, request_id, "in_progress").await;
    assert!(matches!(in_progress, Ok(Json(ref body)) if body.state == "in_progress"));

    let survey = record_survey_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Json(survey_payload()),
    )
    .await;
    assert!(matches!(survey, Ok((status, _)) if status == StatusCode::CREATED));

    let same_day = record_survey_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Json(survey_payload()),
    )
    .await;
    assert!(matches!(same_day, Err(ApiError(AppError::Conflict(_)))));

    let audit = list_request_audit_handler(State(state.clone()), Path(request_id)).await;
    assert!(audit.is_ok());
    let Ok(Json(audit)) = audit else {
        return;
    };
    let steps: Vec<(Option<&str>, &str)> = audit
        .iter()
        .map(|entry| (entry.previous_state.as_deref(), entry.next_state.as_str()))
        .collect();
    assert_eq!(
        steps,
        vec![
            (None, "pending"),
            (Some("pending"), "active"),
            (Some("active"), "in_progress"),
        ]
    );
}

#[tokio::test]
async fn illegal_transition_is_rejected_without_audit() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;
    let neighborhood_id = seed_neighborhood(&state, &admin).await;

    let Ok((_, Json(request))) = open_request(&state, &admin, neighborhood_id, "new").await else {
        panic!("request was not opened");
    };
    let request_id = Uuid::parse_str(&request.request_id).unwrap_or_default();

    let skipped = transition(&state, &admin, request_id, "in_progress").await;
    let Err(error) = skipped else {
        panic!("pending request skipped straight to in_progress");
    };
    assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);

    let audit = list_request_audit_handler(State(state.clone()), Path(request_id)).await;
    assert!(matches!(audit, Ok(Json(ref rows)) if rows.len() == 1));
}

#[tokio::test]
async fn listing_filters_by_state_and_rejects_unknown_states() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;
    let neighborhood_id = seed_neighborhood(&state, &admin).await;

    assert!(open_request(&state, &admin, neighborhood_id, "new").await.is_ok());
    let Ok((_, Json(update))) = open_request(&state, &admin, neighborhood_id, "update").await
    else {
        panic!("update request was not opened");
    };
    let update_id = Uuid::parse_str(&update.request_id).unwrap_or_default();
    assert!(transition(&state, &admin, update_id, "inactive").await.is_ok());

    let pending = list_requests_handler(
        State(state.clone()),
        Query(RequestListParams {
            state: Some("pending".to_owned()),
            ..RequestListParams::default()
        }),
    )
    .await;
    assert!(matches!(pending, Ok(Json(ref rows)) if rows.len() == 1 && rows[0].kind == "new"));

    let unknown = list_requests_handler(
        State(state.clone()),
        Query(RequestListParams {
            state: Some("archived".to_owned()),
            ..RequestListParams::default()
        }),
    )
    .await;
    assert!(matches!(unknown, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn notes_update_keeps_state() {
    let state = in_memory_state();
    let admin = superuser(&state, "root").await;
    let neighborhood_id = seed_neighborhood(&state, &admin).await;

    let Ok((_, Json(request))) = open_request(&state, &admin, neighborhood_id, "new").await else {
        panic!("request was not opened");
    };
    let request_id = Uuid::parse_str(&request.request_id).unwrap_or_default();

    let updated = update_request_notes_handler(
        State(state.clone()),
        Extension(admin.clone()),
        Path(request_id),
        Json(UpdateRequestNotesPayload {
            notes: "bring maps".to_owned(),
        }),
    )
    .await;
    assert!(
        matches!(updated, Ok(Json(ref body)) if body.notes == "bring maps" && body.state == "pending")
    );

    let fetched = get_request_handler(State(state.clone()), Path(request_id)).await;
    assert!(matches!(fetched, Ok(Json(ref body)) if body.notes == "bring maps"));
}
