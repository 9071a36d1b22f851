use std::sync::Arc;

use relevar_application::{
    AreaRepository, AreaService, AuthorizationRepository, AuthorizationService,
    GeographyRepository, GeographyService, NotificationRepository, NotificationService,
    RequestRepository, RequestService, RoleRepository, SurveyRepository, SurveyService,
    UserRepository, UserService,
};
use sqlx::PgPool;

/// Port implementations the services are built from.
pub struct RepositorySet {
    pub authorization: Arc<dyn AuthorizationRepository>,
    pub geography: Arc<dyn GeographyRepository>,
    pub areas: Arc<dyn AreaRepository>,
    pub requests: Arc<dyn RequestRepository>,
    pub surveys: Arc<dyn SurveyRepository>,
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub geography_service: GeographyService,
    pub area_service: AreaService,
    pub request_service: RequestService,
    pub survey_service: SurveyService,
    pub user_service: UserService,
    pub notification_service: NotificationService,
    /// Absent when the state runs on in-memory adapters.
    pub postgres_pool: Option<PgPool>,
}

impl AppState {
    pub fn from_repositories(repositories: RepositorySet, postgres_pool: Option<PgPool>) -> Self {
        let authorization_service = AuthorizationService::new(repositories.authorization);
        let notification_service =
            NotificationService::new(repositories.notifications, repositories.users.clone());

        Self {
            geography_service: GeographyService::new(
                authorization_service.clone(),
                repositories.geography.clone(),
                notification_service.clone(),
            ),
            area_service: AreaService::new(authorization_service.clone(), repositories.areas),
            request_service: RequestService::new(
                authorization_service.clone(),
                repositories.geography.clone(),
                repositories.requests.clone(),
                notification_service.clone(),
            ),
            survey_service: SurveyService::new(
                authorization_service.clone(),
                repositories.geography,
                repositories.requests,
                repositories.surveys,
            ),
            user_service: UserService::new(
                authorization_service,
                repositories.users,
                repositories.roles,
                notification_service.clone(),
            ),
            notification_service,
            postgres_pool,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use relevar_application::RegisterUserInput;
    use relevar_core::UserIdentity;
    use relevar_domain::AccountStatus;
    use relevar_infrastructure::InMemoryRepository;

    use super::{AppState, RepositorySet};

    /// State wired to one shared in-memory store.
    pub(crate) fn in_memory_state() -> AppState {
        let store = Arc::new(InMemoryRepository::new());
        AppState::from_repositories(
            RepositorySet {
                authorization: store.clone(),
                geography: store.clone(),
                areas: store.clone(),
                requests: store.clone(),
                surveys: store.clone(),
                users: store.clone(),
                roles: store.clone(),
                notifications: store,
            },
            None,
        )
    }

    /// Creates an active superuser and returns its acting identity.
    pub(crate) async fn superuser(state: &AppState, username: &str) -> UserIdentity {
        let account = state
            .user_service
            .bootstrap_superuser(username)
            .await
            .unwrap_or_else(|error| panic!("failed to seed superuser: {error}"));
        state
            .user_service
            .resolve_identity(account.id)
            .await
            .unwrap_or_else(|error| panic!("failed to resolve superuser: {error}"))
    }

    /// Creates an active account holding only the guest role.
    pub(crate) async fn member(state: &AppState, admin: &UserIdentity, username: &str) -> UserIdentity {
        let account = state
            .user_service
            .create_user(
                admin,
                RegisterUserInput {
                    username: username.to_owned(),
                    ..RegisterUserInput::default()
                },
                None,
                AccountStatus::Active,
            )
            .await
            .unwrap_or_else(|error| panic!("failed to seed member: {error}"));
        state
            .user_service
            .resolve_identity(account.id)
            .await
            .unwrap_or_else(|error| panic!("failed to resolve member: {error}"))
    }
}
