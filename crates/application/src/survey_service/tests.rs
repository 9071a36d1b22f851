use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use relevar_core::{AppError, UserIdentity};
use relevar_domain::{
    DistrictId, EntityCode, Neighborhood, NeighborhoodId, NeighborhoodStatus, Permission,
    RequestId, RequestKind, RequestState, SurveyRequest, SurveyRequestParts,
};

use crate::test_support::FakeStore;
use crate::{AuthorizationService, RecordSurveyInput, SurveyService};

fn service(store: &Arc<FakeStore>) -> SurveyService {
    SurveyService::new(
        AuthorizationService::new(store.clone()),
        store.clone(),
        store.clone(),
        store.clone(),
    )
}

async fn seed_neighborhood(store: &FakeStore, name: &str, code: u32) -> NeighborhoodId {
    let code = EntityCode::new(code).unwrap_or_else(|_| unreachable!());
    let neighborhood = Neighborhood::new(
        NeighborhoodId::new(),
        name,
        code,
        NeighborhoodStatus::Active,
        None,
        None,
        vec![DistrictId::new()],
    )
    .unwrap_or_else(|_| unreachable!());
    let neighborhood_id = neighborhood.id();
    store.neighborhoods.lock().await.push(neighborhood);
    neighborhood_id
}

async fn seed_request(
    store: &FakeStore,
    neighborhood_id: NeighborhoodId,
    state: RequestState,
) -> RequestId {
    let now = Utc::now();
    let request = SurveyRequest::from_parts(SurveyRequestParts {
        id: RequestId::new(),
        neighborhood_id,
        kind: RequestKind::New,
        state,
        created_by: None,
        created_at: now,
        updated_at: now,
        notes: String::new(),
    });
    let request_id = request.id();
    store.requests.lock().await.push(request);
    request_id
}

async fn surveyor(store: &FakeStore) -> UserIdentity {
    store
        .seed_user("surveyor", &[Permission::SurveyRecord], false)
        .await
}

fn input(neighborhood_id: NeighborhoodId, request_id: Option<RequestId>) -> RecordSurveyInput {
    RecordSurveyInput {
        neighborhood_id,
        request_id,
        performed_at: None,
        data: json!({"households": 12}),
    }
}

#[tokio::test]
async fn only_in_progress_requests_accept_surveys() {
    let store = Arc::new(FakeStore::default());
    let actor = surveyor(&store).await;
    let neighborhood_id = seed_neighborhood(&store, "San Roque", 1).await;
    let service = service(&store);

    for state in [
        RequestState::Pending,
        RequestState::Active,
        RequestState::Inactive,
    ] {
        let request_id = seed_request(&store, neighborhood_id, state).await;
        let result = service
            .record_survey(&actor, input(neighborhood_id, Some(request_id)))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
    assert!(store.surveys.lock().await.is_empty());

    let request_id = seed_request(&store, neighborhood_id, RequestState::InProgress).await;
    let recorded = service
        .record_survey(&actor, input(neighborhood_id, Some(request_id)))
        .await;
    assert!(matches!(recorded, Ok(ref survey) if survey.request_id() == Some(request_id)));
}

#[tokio::test]
async fn request_for_another_neighborhood_is_rejected() {
    let store = Arc::new(FakeStore::default());
    let actor = surveyor(&store).await;
    let first = seed_neighborhood(&store, "San Roque", 1).await;
    let second = seed_neighborhood(&store, "Santa Ana", 2).await;
    let service = service(&store);

    let request_id = seed_request(&store, first, RequestState::InProgress).await;
    let result = service
        .record_survey(&actor, input(second, Some(request_id)))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn one_survey_per_neighborhood_per_day() {
    let store = Arc::new(FakeStore::default());
    let actor = surveyor(&store).await;
    let neighborhood_id = seed_neighborhood(&store, "San Roque", 1).await;
    let other = seed_neighborhood(&store, "Santa Ana", 2).await;
    let service = service(&store);

    let morning = Utc
        .with_ymd_and_hms(2026, 5, 4, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let at = |performed_at| RecordSurveyInput {
        performed_at: Some(performed_at),
        ..input(neighborhood_id, None)
    };

    assert!(service.record_survey(&actor, at(morning)).await.is_ok());

    let evening = service
        .record_survey(&actor, at(morning + Duration::hours(8)))
        .await;
    assert!(matches!(evening, Err(AppError::Conflict(_))));

    let next_day = service
        .record_survey(&actor, at(morning + Duration::days(1)))
        .await;
    assert!(next_day.is_ok());

    let elsewhere = service
        .record_survey(
            &actor,
            RecordSurveyInput {
                performed_at: Some(morning),
                ..input(other, None)
            },
        )
        .await;
    assert!(elsewhere.is_ok());

    let listed = service
        .list_surveys(Some(neighborhood_id))
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn unknown_references_and_missing_permission_are_reported() {
    let store = Arc::new(FakeStore::default());
    let guest = store.seed_user("guest", &[], false).await;
    let actor = surveyor(&store).await;
    let neighborhood_id = seed_neighborhood(&store, "San Roque", 1).await;
    let service = service(&store);

    let forbidden = service
        .record_survey(&guest, input(neighborhood_id, None))
        .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

    let unknown_neighborhood = service
        .record_survey(&actor, input(NeighborhoodId::new(), None))
        .await;
    assert!(matches!(unknown_neighborhood, Err(AppError::NotFound(_))));

    let unknown_request = service
        .record_survey(&actor, input(neighborhood_id, Some(RequestId::new())))
        .await;
    assert!(matches!(unknown_request, Err(AppError::NotFound(_))));
}
