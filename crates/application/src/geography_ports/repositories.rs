use async_trait::async_trait;

use relevar_core::AppResult;
use relevar_domain::{
    Area, AreaId, Department, DepartmentId, District, DistrictId, Neighborhood, NeighborhoodId,
    Objective, ObjectiveId,
};

use super::codes::{CodeRegistry, CodedInsert};
use super::inputs::NeighborhoodFilter;

/// Repository port for the department → district → neighborhood hierarchy.
#[async_trait]
pub trait GeographyRepository:
    CodeRegistry + CodedInsert<Department> + CodedInsert<District> + CodedInsert<Neighborhood>
{
    /// Lists departments ordered by name.
    async fn list_departments(&self) -> AppResult<Vec<Department>>;

    /// Finds one department.
    async fn find_department(&self, department_id: DepartmentId)
    -> AppResult<Option<Department>>;

    /// Persists the editable attributes of a department.
    async fn update_department(&self, department: &Department) -> AppResult<()>;

    /// Deletes a department.
    async fn delete_department(&self, department_id: DepartmentId) -> AppResult<()>;

    /// Returns whether any district belongs to the department.
    async fn department_has_districts(&self, department_id: DepartmentId) -> AppResult<bool>;

    /// Lists districts ordered by department then name.
    async fn list_districts(&self, department_id: Option<DepartmentId>)
    -> AppResult<Vec<District>>;

    /// Finds one district.
    async fn find_district(&self, district_id: DistrictId) -> AppResult<Option<District>>;

    /// Persists the editable attributes of a district.
    async fn update_district(&self, district: &District) -> AppResult<()>;

    /// Deletes a district.
    async fn delete_district(&self, district_id: DistrictId) -> AppResult<()>;

    /// Returns whether any neighborhood is linked to the district.
    async fn district_has_neighborhoods(&self, district_id: DistrictId) -> AppResult<bool>;

    /// Lists neighborhoods matching `filter`, ordered by name.
    async fn list_neighborhoods(&self, filter: NeighborhoodFilter) -> AppResult<Vec<Neighborhood>>;

    /// Finds one neighborhood.
    async fn find_neighborhood(
        &self,
        neighborhood_id: NeighborhoodId,
    ) -> AppResult<Option<Neighborhood>>;

    /// Persists the editable attributes and district links of a neighborhood.
    async fn update_neighborhood(&self, neighborhood: &Neighborhood) -> AppResult<()>;

    /// Deletes a neighborhood.
    async fn delete_neighborhood(&self, neighborhood_id: NeighborhoodId) -> AppResult<()>;

    /// Returns whether requests or surveys reference the neighborhood.
    async fn neighborhood_has_activity(&self, neighborhood_id: NeighborhoodId) -> AppResult<bool>;
}

/// Repository port for areas and their objectives.
#[async_trait]
pub trait AreaRepository: CodeRegistry + CodedInsert<Area> + CodedInsert<Objective> {
    /// Lists areas ordered by name.
    async fn list_areas(&self) -> AppResult<Vec<Area>>;

    /// Finds one area.
    async fn find_area(&self, area_id: AreaId) -> AppResult<Option<Area>>;

    /// Deletes an area together with its objectives.
    async fn delete_area(&self, area_id: AreaId) -> AppResult<()>;

    /// Lists the objectives of an area ordered by name.
    async fn list_objectives(&self, area_id: AreaId) -> AppResult<Vec<Objective>>;

    /// Finds one objective.
    async fn find_objective(&self, objective_id: ObjectiveId) -> AppResult<Option<Objective>>;

    /// Deletes an objective.
    async fn delete_objective(&self, objective_id: ObjectiveId) -> AppResult<()>;
}
