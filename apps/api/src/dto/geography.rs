use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

mod conversions;

/// Incoming payload for department creation and renaming.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-department-request.ts"
)]
pub struct SaveDepartmentRequest {
    pub name: String,
}

/// Incoming payload for district creation and editing.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-district-request.ts"
)]
pub struct SaveDistrictRequest {
    pub name: String,
    pub department_id: Uuid,
}

/// Incoming payload for neighborhood creation and editing.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-neighborhood-request.ts"
)]
pub struct SaveNeighborhoodRequest {
    pub name: String,
    /// `active` or `inactive`. Defaults to `active`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub parent_property: Option<String>,
    #[serde(default)]
    pub parent_registry: Option<String>,
    pub district_ids: Vec<Uuid>,
}

/// Query string of the district listing.
#[derive(Debug, Default, Deserialize)]
pub struct DistrictListQuery {
    pub department_id: Option<Uuid>,
}

/// Query string of the neighborhood listing.
#[derive(Debug, Default, Deserialize)]
pub struct NeighborhoodListQuery {
    pub name: Option<String>,
    pub status: Option<String>,
    pub district_id: Option<Uuid>,
}

/// API representation of a department.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/department-response.ts"
)]
pub struct DepartmentResponse {
    pub department_id: String,
    pub code: u32,
    pub name: String,
}

/// API representation of a district.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/district-response.ts"
)]
pub struct DistrictResponse {
    pub district_id: String,
    pub department_id: String,
    pub code: u32,
    pub name: String,
}

/// API representation of a neighborhood.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/neighborhood-response.ts"
)]
pub struct NeighborhoodResponse {
    pub neighborhood_id: String,
    pub code: u32,
    pub name: String,
    pub status: String,
    pub parent_property: Option<String>,
    pub parent_registry: Option<String>,
    pub district_ids: Vec<String>,
}
