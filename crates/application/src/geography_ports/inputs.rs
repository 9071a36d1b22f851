use relevar_domain::{DepartmentId, DistrictId, NeighborhoodStatus};

/// Input payload for creating a district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDistrictInput {
    /// District name, unique within the department.
    pub name: String,
    /// Parent department.
    pub department_id: DepartmentId,
}

/// Input payload for editing a district.
pub type UpdateDistrictInput = CreateDistrictInput;

/// Input payload for creating or editing a neighborhood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveNeighborhoodInput {
    /// Neighborhood name, globally unique.
    pub name: String,
    /// Lifecycle status.
    pub status: NeighborhoodStatus,
    /// Parent property reference.
    pub parent_property: Option<String>,
    /// Parent registry reference.
    pub parent_registry: Option<String>,
    /// Linked districts. At least one is required.
    pub district_ids: Vec<DistrictId>,
}

/// Filters for neighborhood listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborhoodFilter {
    /// Case-insensitive name substring.
    pub name_contains: Option<String>,
    /// Status filter.
    pub status: Option<NeighborhoodStatus>,
    /// Only neighborhoods linked to this district.
    pub district_id: Option<DistrictId>,
}

/// Input payload for creating an area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaInput {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
}

/// Input payload for creating an objective inside an area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveInput {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
}
