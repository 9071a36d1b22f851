use std::sync::Arc;

use relevar_core::{AppError, AppResult, UserIdentity};
use relevar_domain::{
    CodeScope, Department, DepartmentId, District, DistrictId, Neighborhood, NeighborhoodId,
    NotificationKind, Permission, UserId,
};

use crate::code_assignment::insert_with_next_code;
use crate::geography_ports::GeographyRepository;
use crate::notification_ports::AdminNotice;
use crate::{AuthorizationService, NotificationService};

mod departments;
mod districts;
mod neighborhoods;

/// Application service for the department → district → neighborhood hierarchy.
#[derive(Clone)]
pub struct GeographyService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn GeographyRepository>,
    notification_service: NotificationService,
}

impl GeographyService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn GeographyRepository>,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            notification_service,
        }
    }

    async fn require_geography_manage(&self, actor: &UserIdentity) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor, Permission::GeographyManage)
            .await
    }

    async fn require_department(&self, department_id: DepartmentId) -> AppResult<Department> {
        self.repository
            .find_department(department_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("department '{department_id}' does not exist"))
            })
    }

    async fn require_district(&self, district_id: DistrictId) -> AppResult<District> {
        self.repository
            .find_district(district_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("district '{district_id}' does not exist")))
    }

    async fn require_neighborhood(&self, neighborhood_id: NeighborhoodId) -> AppResult<Neighborhood> {
        self.repository
            .find_neighborhood(neighborhood_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("neighborhood '{neighborhood_id}' does not exist"))
            })
    }
}

#[cfg(test)]
mod tests;
