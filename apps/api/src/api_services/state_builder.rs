use std::sync::Arc;

use relevar_infrastructure::{
    PostgresAreaRepository, PostgresAuthorizationRepository, PostgresGeographyRepository,
    PostgresNotificationRepository, PostgresRequestRepository, PostgresRoleRepository,
    PostgresSurveyRepository, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::state::{AppState, RepositorySet};

pub fn build_app_state(pool: PgPool) -> AppState {
    let repositories = RepositorySet {
        authorization: Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
        geography: Arc::new(PostgresGeographyRepository::new(pool.clone())),
        areas: Arc::new(PostgresAreaRepository::new(pool.clone())),
        requests: Arc::new(PostgresRequestRepository::new(pool.clone())),
        surveys: Arc::new(PostgresSurveyRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        roles: Arc::new(PostgresRoleRepository::new(pool.clone())),
        notifications: Arc::new(PostgresNotificationRepository::new(pool.clone())),
    };

    AppState::from_repositories(repositories, Some(pool))
}
