//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod area;
mod code;
mod geography;
mod ids;
mod notification;
mod request;
mod role;
mod security;
mod survey;
mod user;

pub use area::{Area, Objective};
pub use code::{CodeScope, EntityCode, next_free_code};
pub use geography::{Department, District, Neighborhood, NeighborhoodStatus};
pub use ids::{
    AreaId, DepartmentId, DistrictId, NeighborhoodId, NotificationId, ObjectiveId, RequestAuditId,
    RequestId, RoleId, SurveyId, UserId,
};
pub use notification::{Notification, NotificationKind};
pub use request::{
    RequestAuditEntry, RequestKind, RequestState, RequestTransition, SurveyRequest,
    SurveyRequestParts, can_transition,
};
pub use role::{
    ADMINISTRATOR_ROLE_COLOR, ADMINISTRATOR_ROLE_NAME, DEFAULT_ROLE_COLOR, EffectiveRole,
    GUEST_ROLE_NAME, NO_ROLE_COLOR, NO_ROLE_LABEL, Role, effective_role_color,
    effective_role_name,
};
pub use security::Permission;
pub use survey::{Survey, SurveyParts, ensure_request_accepts_survey};
pub use user::{
    AccountOrigin, AccountStatus, EmailAddress, NationalId, PhoneNumber, UserAccount,
};
