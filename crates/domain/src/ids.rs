use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a department.
    DepartmentId
);
entity_id!(
    /// Unique identifier for a district.
    DistrictId
);
entity_id!(
    /// Unique identifier for a neighborhood.
    NeighborhoodId
);
entity_id!(
    /// Unique identifier for an area.
    AreaId
);
entity_id!(
    /// Unique identifier for an objective.
    ObjectiveId
);
entity_id!(
    /// Unique identifier for a survey request.
    RequestId
);
entity_id!(
    /// Unique identifier for one request audit row.
    RequestAuditId
);
entity_id!(
    /// Unique identifier for a survey.
    SurveyId
);
entity_id!(
    /// Unique identifier for a user account.
    UserId
);
entity_id!(
    /// Unique identifier for a role.
    RoleId
);
entity_id!(
    /// Unique identifier for a notification.
    NotificationId
);
