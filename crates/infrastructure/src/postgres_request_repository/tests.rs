use chrono::Utc;
use relevar_application::{RequestListQuery, RequestRepository};
use relevar_core::AppError;
use relevar_domain::{NeighborhoodId, RequestKind, RequestState, SurveyRequest};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresRequestRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres request tests: {error}");
    }

    Some(pool)
}

async fn seed_neighborhood(pool: &PgPool) -> NeighborhoodId {
    let neighborhood_id = Uuid::new_v4();
    let result = sqlx::query(
        r#"
        INSERT INTO neighborhoods (id, name, code, status)
        SELECT $1, $2, COALESCE(MAX(code), 0) + 1000, 'active' FROM neighborhoods
        "#,
    )
    .bind(neighborhood_id)
    .bind(format!("Barrio-{neighborhood_id}"))
    .execute(pool)
    .await;

    if let Err(error) = result {
        panic!("failed to seed neighborhood: {error}");
    }

    NeighborhoodId::from_uuid(neighborhood_id)
}

fn open_request(neighborhood_id: NeighborhoodId) -> SurveyRequest {
    SurveyRequest::open(neighborhood_id, RequestKind::New, None, "", Utc::now())
}

#[tokio::test]
async fn second_open_request_of_same_kind_conflicts() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRequestRepository::new(pool.clone());
    let neighborhood_id = seed_neighborhood(&pool).await;

    let first = open_request(neighborhood_id);
    let second = open_request(neighborhood_id);

    assert!(
        repository
            .create_request(&first, &first.creation_audit_entry())
            .await
            .is_ok()
    );
    let duplicate = repository
        .create_request(&second, &second.creation_audit_entry())
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let open = repository
        .find_open_request(neighborhood_id, RequestKind::New)
        .await;
    assert!(matches!(open, Ok(Some(ref request)) if request.id() == first.id()));
}

#[tokio::test]
async fn stale_transition_is_rejected_and_audit_is_ordered() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRequestRepository::new(pool.clone());
    let neighborhood_id = seed_neighborhood(&pool).await;

    let mut request = open_request(neighborhood_id);
    assert!(
        repository
            .create_request(&request, &request.creation_audit_entry())
            .await
            .is_ok()
    );

    let Ok(transition) =
        request.plan_transition(RequestState::Active, None, "approved", Utc::now())
    else {
        panic!("pending requests can be approved");
    };

    assert!(
        repository
            .save_transition(&transition, &transition.audit_entry())
            .await
            .is_ok()
    );
    assert!(matches!(
        repository
            .save_transition(&transition, &transition.audit_entry())
            .await,
        Err(AppError::Conflict(_))
    ));
    assert!(request.apply(&transition).is_ok());

    let stored = repository.find_request(request.id()).await;
    assert!(matches!(stored, Ok(Some(ref stored)) if stored.state() == RequestState::Active));

    let audit = repository.list_audit(request.id()).await.unwrap_or_default();
    assert_eq!(audit.len(), 2);
    assert_eq!(audit[0].previous, None);
    assert_eq!(audit[0].next, RequestState::Pending);
    assert_eq!(audit[1].previous, Some(RequestState::Pending));
    assert_eq!(audit[1].comment, "approved");

    let listed = repository
        .list_requests(RequestListQuery {
            state: Some(RequestState::Active),
            neighborhood_id: Some(neighborhood_id),
            ..RequestListQuery::default()
        })
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 1);
}
