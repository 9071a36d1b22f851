use relevar_application::{AreaRepository, GeographyRepository, NeighborhoodFilter};

use super::*;

fn sorted_by_name<T: Clone>(rows: impl Iterator<Item = T>, name: impl Fn(&T) -> String) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(name);
    rows
}

fn in_use(kind: &str, id: impl std::fmt::Display, dependents: &str) -> AppError {
    AppError::Conflict(format!("{kind} '{id}' still has {dependents}"))
}

#[async_trait]
impl GeographyRepository for InMemoryRepository {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        let state = self.state.read().await;
        Ok(sorted_by_name(state.departments.values().cloned(), |row| {
            row.name().to_string()
        }))
    }

    async fn find_department(&self, department_id: DepartmentId) -> AppResult<Option<Department>> {
        Ok(self.state.read().await.departments.get(&department_id).cloned())
    }

    async fn update_department(&self, department: &Department) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state
            .departments
            .values()
            .any(|row| row.id() != department.id() && row.name() == department.name())
        {
            return Err(name_conflict("department", department.name().as_str()));
        }
        if let Some(row) = state.departments.get_mut(&department.id()) {
            *row = department.clone();
        }

        Ok(())
    }

    async fn delete_department(&self, department_id: DepartmentId) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state
            .districts
            .values()
            .any(|district| district.department_id() == department_id)
        {
            return Err(in_use("department", department_id, "districts"));
        }
        state.departments.remove(&department_id);

        Ok(())
    }

    async fn department_has_districts(&self, department_id: DepartmentId) -> AppResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .districts
            .values()
            .any(|district| district.department_id() == department_id))
    }

    async fn list_districts(&self, department_id: Option<DepartmentId>) -> AppResult<Vec<District>> {
        let state = self.state.read().await;
        let department_name = |district: &District| {
            state
                .departments
                .get(&district.department_id())
                .map(|department| department.name().to_string())
                .unwrap_or_default()
        };

        let mut districts: Vec<District> = state
            .districts
            .values()
            .filter(|district| department_id.is_none_or(|id| district.department_id() == id))
            .cloned()
            .collect();
        districts.sort_by_key(|district| (department_name(district), district.name().to_string()));

        Ok(districts)
    }

    async fn find_district(&self, district_id: DistrictId) -> AppResult<Option<District>> {
        Ok(self.state.read().await.districts.get(&district_id).cloned())
    }

    async fn update_district(&self, district: &District) -> AppResult<()> {
        let mut state = self.state.write().await;

        if !state.departments.contains_key(&district.department_id()) {
            return Err(AppError::NotFound(format!(
                "department '{}' does not exist",
                district.department_id()
            )));
        }
        if state.districts.values().any(|row| {
            row.id() != district.id()
                && row.department_id() == district.department_id()
                && row.name() == district.name()
        }) {
            return Err(name_conflict("district", district.name().as_str()));
        }
        if let Some(row) = state.districts.get_mut(&district.id()) {
            *row = district.clone();
        }

        Ok(())
    }

    async fn delete_district(&self, district_id: DistrictId) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state
            .neighborhoods
            .values()
            .any(|neighborhood| neighborhood.district_ids().contains(&district_id))
        {
            return Err(in_use("district", district_id, "neighborhoods"));
        }
        state.districts.remove(&district_id);

        Ok(())
    }

    async fn district_has_neighborhoods(&self, district_id: DistrictId) -> AppResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .neighborhoods
            .values()
            .any(|neighborhood| neighborhood.district_ids().contains(&district_id)))
    }

    async fn list_neighborhoods(&self, filter: NeighborhoodFilter) -> AppResult<Vec<Neighborhood>> {
        let state = self.state.read().await;
        let needle = filter
            .name_contains
            .as_deref()
            .map(str::to_lowercase)
            .filter(|needle| !needle.is_empty());

        let matching = state.neighborhoods.values().filter(|row| {
            filter.status.is_none_or(|status| row.status() == status)
                && filter
                    .district_id
                    .is_none_or(|district_id| row.district_ids().contains(&district_id))
                && needle
                    .as_deref()
                    .is_none_or(|needle| row.name().as_str().to_lowercase().contains(needle))
        });

        Ok(sorted_by_name(matching.cloned(), |row| row.name().to_string()))
    }

    async fn find_neighborhood(
        &self,
        neighborhood_id: NeighborhoodId,
    ) -> AppResult<Option<Neighborhood>> {
        Ok(self
            .state
            .read()
            .await
            .neighborhoods
            .get(&neighborhood_id)
            .cloned())
    }

    async fn update_neighborhood(&self, neighborhood: &Neighborhood) -> AppResult<()> {
        let mut state = self.state.write().await;

        state.ensure_districts_exist(neighborhood.district_ids())?;
        if state
            .neighborhoods
            .values()
            .any(|row| row.id() != neighborhood.id() && row.name() == neighborhood.name())
        {
            return Err(name_conflict("neighborhood", neighborhood.name().as_str()));
        }
        if let Some(row) = state.neighborhoods.get_mut(&neighborhood.id()) {
            *row = neighborhood.clone();
        }

        Ok(())
    }

    async fn delete_neighborhood(&self, neighborhood_id: NeighborhoodId) -> AppResult<()> {
        let mut state = self.state.write().await;

        let has_requests = state
            .requests
            .values()
            .any(|request| request.neighborhood_id() == neighborhood_id);
        let has_surveys = state
            .surveys
            .values()
            .any(|survey| survey.neighborhood_id() == neighborhood_id);
        if has_requests || has_surveys {
            return Err(in_use("neighborhood", neighborhood_id, "requests or surveys"));
        }
        state.neighborhoods.remove(&neighborhood_id);

        Ok(())
    }

    async fn neighborhood_has_activity(&self, neighborhood_id: NeighborhoodId) -> AppResult<bool> {
        let state = self.state.read().await;

        Ok(state
            .requests
            .values()
            .any(|request| request.neighborhood_id() == neighborhood_id)
            || state
                .surveys
                .values()
                .any(|survey| survey.neighborhood_id() == neighborhood_id))
    }
}

#[async_trait]
impl AreaRepository for InMemoryRepository {
    async fn list_areas(&self) -> AppResult<Vec<Area>> {
        let state = self.state.read().await;
        Ok(sorted_by_name(state.areas.values().cloned(), |row| {
            row.name().to_string()
        }))
    }

    async fn find_area(&self, area_id: AreaId) -> AppResult<Option<Area>> {
        Ok(self.state.read().await.areas.get(&area_id).cloned())
    }

    async fn delete_area(&self, area_id: AreaId) -> AppResult<()> {
        let mut state = self.state.write().await;

        state.areas.remove(&area_id);
        state
            .objectives
            .retain(|_, objective| objective.area_id() != area_id);

        Ok(())
    }

    async fn list_objectives(&self, area_id: AreaId) -> AppResult<Vec<Objective>> {
        let state = self.state.read().await;
        let objectives = state
            .objectives
            .values()
            .filter(|objective| objective.area_id() == area_id)
            .cloned();

        Ok(sorted_by_name(objectives, |row| row.name().to_string()))
    }

    async fn find_objective(&self, objective_id: ObjectiveId) -> AppResult<Option<Objective>> {
        Ok(self.state.read().await.objectives.get(&objective_id).cloned())
    }

    async fn delete_objective(&self, objective_id: ObjectiveId) -> AppResult<()> {
        self.state.write().await.objectives.remove(&objective_id);
        Ok(())
    }
}
