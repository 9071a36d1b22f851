use std::sync::Arc;

use relevar_core::{AppError, AppResult, UserIdentity};
use relevar_domain::{Area, AreaId, CodeScope, Objective, ObjectiveId, Permission};

use crate::AuthorizationService;
use crate::code_assignment::insert_with_next_code;
use crate::geography_ports::{AreaInput, AreaRepository, ObjectiveInput};

/// Application service for planning areas and their objectives.
#[derive(Clone)]
pub struct AreaService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn AreaRepository>,
}

impl AreaService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn AreaRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
        }
    }

    /// Lists areas ordered by name.
    pub async fn list_areas(&self) -> AppResult<Vec<Area>> {
        self.repository.list_areas().await
    }

    /// Returns one area.
    pub async fn get_area(&self, area_id: AreaId) -> AppResult<Area> {
        self.repository
            .find_area(area_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("area '{area_id}' does not exist")))
    }

    /// Creates an area with the next free code.
    pub async fn create_area(&self, actor: &UserIdentity, input: AreaInput) -> AppResult<Area> {
        self.require_geography_manage(actor).await?;

        insert_with_next_code(self.repository.as_ref(), CodeScope::Areas, |code| {
            Area::new(
                AreaId::new(),
                input.name.as_str(),
                input.description.as_str(),
                code,
            )
        })
        .await
    }

    /// Deletes an area and its objectives.
    pub async fn delete_area(&self, actor: &UserIdentity, area_id: AreaId) -> AppResult<()> {
        self.require_geography_manage(actor).await?;
        self.get_area(area_id).await?;
        self.repository.delete_area(area_id).await
    }

    /// Lists the objectives of an area.
    pub async fn list_objectives(&self, area_id: AreaId) -> AppResult<Vec<Objective>> {
        self.get_area(area_id).await?;
        self.repository.list_objectives(area_id).await
    }

    /// Creates an objective numbered within its area.
    pub async fn create_objective(
        &self,
        actor: &UserIdentity,
        area_id: AreaId,
        input: ObjectiveInput,
    ) -> AppResult<Objective> {
        self.require_geography_manage(actor).await?;
        self.get_area(area_id).await?;

        insert_with_next_code(
            self.repository.as_ref(),
            CodeScope::Objectives(area_id),
            |code| {
                Objective::new(
                    ObjectiveId::new(),
                    area_id,
                    input.name.as_str(),
                    input.description.as_str(),
                    code,
                )
            },
        )
        .await
    }

    /// Deletes an objective.
    pub async fn delete_objective(
        &self,
        actor: &UserIdentity,
        objective_id: ObjectiveId,
    ) -> AppResult<()> {
        self.require_geography_manage(actor).await?;

        if self.repository.find_objective(objective_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "objective '{objective_id}' does not exist"
            )));
        }

        self.repository.delete_objective(objective_id).await
    }

    async fn require_geography_manage(&self, actor: &UserIdentity) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor, Permission::GeographyManage)
            .await
    }
}
