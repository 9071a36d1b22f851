mod areas;
mod common;
mod geography;
mod notifications;
mod requests;
mod surveys;
mod users;

pub use areas::{AreaResponse, CreateAreaRequest, CreateObjectiveRequest, ObjectiveResponse};
pub use common::{HealthDependencyStatus, HealthResponse};
pub use geography::{
    DepartmentResponse, DistrictListQuery, DistrictResponse, NeighborhoodListQuery,
    NeighborhoodResponse, SaveDepartmentRequest, SaveDistrictRequest, SaveNeighborhoodRequest,
};
pub use notifications::{
    AffectedRowsResponse, DeleteSelectedNotificationsRequest, NotificationListQuery,
    NotificationResponse, UnreadCountResponse,
};
pub use requests::{
    CreateRequestPayload, RequestAuditEntryResponse, RequestListParams, SurveyRequestResponse,
    TransitionRequestPayload, UpdateRequestNotesPayload,
};
pub use surveys::{RecordSurveyRequest, SurveyListQuery, SurveyResponse};
pub use users::{
    AssignUserRoleRequest, CreateUserRequest, EffectiveRoleResponse, RegisterUserRequest,
    RoleResponse, SaveRoleRequest, UpdateProfileRequest, UpdateUserStatusRequest, UserListQuery,
    UserResponse,
};
