//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_repository;
mod postgres_area_repository;
mod postgres_authorization_repository;
mod postgres_codes;
mod postgres_geography_repository;
mod postgres_notification_repository;
mod postgres_request_repository;
mod postgres_role_repository;
mod postgres_survey_repository;
mod postgres_user_repository;

pub use in_memory_repository::InMemoryRepository;
pub use postgres_area_repository::PostgresAreaRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_geography_repository::PostgresGeographyRepository;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_request_repository::PostgresRequestRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_survey_repository::PostgresSurveyRepository;
pub use postgres_user_repository::PostgresUserRepository;
