//! In-memory adapter implementing every repository port.
//!
//! All tables live behind one lock, so multi-row invariants (code
//! uniqueness, the single open request, one survey per day) hold the same
//! way the database constraints hold them.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use relevar_application::{CodeRegistry, CodedInsert, InsertOutcome};
use relevar_core::{AppError, AppResult};
use relevar_domain::{
    Area, AreaId, CodeScope, Department, DepartmentId, District, DistrictId, EntityCode,
    Neighborhood, NeighborhoodId, Notification, Objective, ObjectiveId, RequestAuditEntry,
    RequestId, Role, RoleId, Survey, SurveyId, SurveyRequest, UserAccount, UserId,
};

mod accounts;
mod geography;
mod requests;

#[derive(Debug, Default)]
struct InMemoryState {
    departments: HashMap<DepartmentId, Department>,
    districts: HashMap<DistrictId, District>,
    neighborhoods: HashMap<NeighborhoodId, Neighborhood>,
    areas: HashMap<AreaId, Area>,
    objectives: HashMap<ObjectiveId, Objective>,
    requests: HashMap<RequestId, SurveyRequest>,
    audit: Vec<RequestAuditEntry>,
    surveys: HashMap<SurveyId, Survey>,
    users: HashMap<UserId, UserAccount>,
    roles: HashMap<RoleId, Role>,
    notifications: Vec<Notification>,
}

impl InMemoryState {
    fn codes(&self, scope: CodeScope) -> Vec<EntityCode> {
        match scope {
            CodeScope::Departments => self.departments.values().map(Department::code).collect(),
            CodeScope::Districts => self.districts.values().map(District::code).collect(),
            CodeScope::Neighborhoods => {
                self.neighborhoods.values().map(Neighborhood::code).collect()
            }
            CodeScope::Areas => self.areas.values().map(Area::code).collect(),
            CodeScope::Objectives(area_id) => self
                .objectives
                .values()
                .filter(|objective| objective.area_id() == area_id)
                .map(Objective::code)
                .collect(),
        }
    }

    fn ensure_districts_exist(&self, district_ids: &[DistrictId]) -> AppResult<()> {
        match district_ids
            .iter()
            .find(|district_id| !self.districts.contains_key(district_id))
        {
            Some(missing) => Err(AppError::NotFound(format!(
                "district '{missing}' does not exist"
            ))),
            None => Ok(()),
        }
    }
}

/// In-memory repository used for tests and local runs without PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<InMemoryState>,
}

impl InMemoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_conflict(kind: &str, name: &str) -> AppError {
    AppError::Conflict(format!("{kind} name '{name}' is already in use"))
}

#[async_trait]
impl CodeRegistry for InMemoryRepository {
    async fn list_codes(&self, scope: CodeScope) -> AppResult<Vec<EntityCode>> {
        Ok(self.state.read().await.codes(scope))
    }
}

#[async_trait]
impl CodedInsert<Department> for InMemoryRepository {
    async fn insert_coded(&self, record: &Department) -> AppResult<InsertOutcome> {
        let mut state = self.state.write().await;

        if state.codes(CodeScope::Departments).contains(&record.code()) {
            return Ok(InsertOutcome::CodeTaken);
        }
        if state
            .departments
            .values()
            .any(|department| department.name() == record.name())
        {
            return Err(name_conflict("department", record.name().as_str()));
        }

        state.departments.insert(record.id(), record.clone());
        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl CodedInsert<District> for InMemoryRepository {
    async fn insert_coded(&self, record: &District) -> AppResult<InsertOutcome> {
        let mut state = self.state.write().await;

        if !state.departments.contains_key(&record.department_id()) {
            return Err(AppError::NotFound(format!(
                "department '{}' does not exist",
                record.department_id()
            )));
        }
        if state.codes(CodeScope::Districts).contains(&record.code()) {
            return Ok(InsertOutcome::CodeTaken);
        }
        if state.districts.values().any(|district| {
            district.department_id() == record.department_id() && district.name() == record.name()
        }) {
            return Err(name_conflict("district", record.name().as_str()));
        }

        state.districts.insert(record.id(), record.clone());
        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl CodedInsert<Neighborhood> for InMemoryRepository {
    async fn insert_coded(&self, record: &Neighborhood) -> AppResult<InsertOutcome> {
        let mut state = self.state.write().await;

        state.ensure_districts_exist(record.district_ids())?;
        if state.codes(CodeScope::Neighborhoods).contains(&record.code()) {
            return Ok(InsertOutcome::CodeTaken);
        }
        if state
            .neighborhoods
            .values()
            .any(|neighborhood| neighborhood.name() == record.name())
        {
            return Err(name_conflict("neighborhood", record.name().as_str()));
        }

        state.neighborhoods.insert(record.id(), record.clone());
        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl CodedInsert<Area> for InMemoryRepository {
    async fn insert_coded(&self, record: &Area) -> AppResult<InsertOutcome> {
        let mut state = self.state.write().await;

        if state.codes(CodeScope::Areas).contains(&record.code()) {
            return Ok(InsertOutcome::CodeTaken);
        }
        if state.areas.values().any(|area| area.name() == record.name()) {
            return Err(name_conflict("area", record.name().as_str()));
        }

        state.areas.insert(record.id(), record.clone());
        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl CodedInsert<Objective> for InMemoryRepository {
    async fn insert_coded(&self, record: &Objective) -> AppResult<InsertOutcome> {
        let mut state = self.state.write().await;

        if !state.areas.contains_key(&record.area_id()) {
            return Err(AppError::NotFound(format!(
                "area '{}' does not exist",
                record.area_id()
            )));
        }
        if state
            .codes(CodeScope::Objectives(record.area_id()))
            .contains(&record.code())
        {
            return Ok(InsertOutcome::CodeTaken);
        }
        if state.objectives.values().any(|objective| {
            objective.area_id() == record.area_id() && objective.name() == record.name()
        }) {
            return Err(name_conflict("objective", record.name().as_str()));
        }

        state.objectives.insert(record.id(), record.clone());
        Ok(InsertOutcome::Inserted)
    }
}
