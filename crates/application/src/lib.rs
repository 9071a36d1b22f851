//! Application services and ports.

#![forbid(unsafe_code)]

mod area_service;
mod authorization_service;
mod code_assignment;
mod geography_ports;
mod geography_service;
mod notification_ports;
mod notification_service;
mod request_ports;
mod request_service;
mod survey_ports;
mod survey_service;
mod user_ports;
mod user_service;

#[cfg(test)]
mod test_support;

pub use area_service::AreaService;
pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use code_assignment::{MAX_CODE_ASSIGNMENT_ATTEMPTS, insert_with_next_code};
pub use geography_ports::{
    AreaInput, AreaRepository, CodeRegistry, CodedInsert, CreateDistrictInput, GeographyRepository,
    InsertOutcome, NeighborhoodFilter, ObjectiveInput, SaveNeighborhoodInput,
    UpdateDistrictInput,
};
pub use geography_service::GeographyService;
pub use notification_ports::{AdminNotice, NotificationRepository};
pub use notification_service::{DEFAULT_NOTIFICATION_LIMIT, NotificationService};
pub use request_ports::{
    CreateRequestInput, RequestListQuery, RequestRepository, TransitionRequestInput,
};
pub use request_service::RequestService;
pub use survey_ports::{RecordSurveyInput, SurveyRepository};
pub use survey_service::SurveyService;
pub use user_ports::{
    RegisterUserInput, RoleRepository, SaveRoleInput, UpdateProfileInput, UserRepository,
};
pub use user_service::UserService;
