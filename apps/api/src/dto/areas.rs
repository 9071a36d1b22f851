use relevar_application::{AreaInput, ObjectiveInput};
use relevar_domain::{Area, Objective};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for area creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-area-request.ts"
)]
pub struct CreateAreaRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Incoming payload for objective creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-objective-request.ts"
)]
pub struct CreateObjectiveRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// API representation of a planning area.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/area-response.ts"
)]
pub struct AreaResponse {
    pub area_id: String,
    pub code: u32,
    pub name: String,
    pub description: String,
    /// `code - name` form used by pickers.
    pub label: String,
}

/// API representation of an objective.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/objective-response.ts"
)]
pub struct ObjectiveResponse {
    pub objective_id: String,
    pub area_id: String,
    pub code: u32,
    pub name: String,
    pub description: String,
}

impl From<CreateAreaRequest> for AreaInput {
    fn from(value: CreateAreaRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

impl From<CreateObjectiveRequest> for ObjectiveInput {
    fn from(value: CreateObjectiveRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

impl From<Area> for AreaResponse {
    fn from(value: Area) -> Self {
        Self {
            area_id: value.id().to_string(),
            code: value.code().value(),
            name: value.name().as_str().to_owned(),
            description: value.description().to_owned(),
            label: value.label(),
        }
    }
}

impl From<Objective> for ObjectiveResponse {
    fn from(value: Objective) -> Self {
        Self {
            objective_id: value.id().to_string(),
            area_id: value.area_id().to_string(),
            code: value.code().value(),
            name: value.name().as_str().to_owned(),
            description: value.description().to_owned(),
        }
    }
}
