use super::*;

use crate::geography_ports::{CreateDistrictInput, UpdateDistrictInput};

impl GeographyService {
    /// Lists districts, optionally restricted to one department.
    pub async fn list_districts(
        &self,
        department_id: Option<DepartmentId>,
    ) -> AppResult<Vec<District>> {
        self.repository.list_districts(department_id).await
    }

    /// Returns one district.
    pub async fn get_district(&self, district_id: DistrictId) -> AppResult<District> {
        self.require_district(district_id).await
    }

    /// Creates a district inside an existing department.
    pub async fn create_district(
        &self,
        actor: &UserIdentity,
        input: CreateDistrictInput,
    ) -> AppResult<District> {
        self.require_geography_manage(actor).await?;
        self.require_department(input.department_id).await?;

        insert_with_next_code(self.repository.as_ref(), CodeScope::Districts, |code| {
            District::new(
                DistrictId::new(),
                input.department_id,
                input.name.as_str(),
                code,
            )
        })
        .await
    }

    /// Renames a district or moves it to another department.
    pub async fn update_district(
        &self,
        actor: &UserIdentity,
        district_id: DistrictId,
        input: UpdateDistrictInput,
    ) -> AppResult<District> {
        self.require_geography_manage(actor).await?;

        let mut district = self.require_district(district_id).await?;
        if district.department_id() != input.department_id {
            self.require_department(input.department_id).await?;
        }

        district.update(input.name, input.department_id)?;
        self.repository.update_district(&district).await?;
        Ok(district)
    }

    /// Deletes a district no neighborhood is linked to.
    pub async fn delete_district(
        &self,
        actor: &UserIdentity,
        district_id: DistrictId,
    ) -> AppResult<()> {
        self.require_geography_manage(actor).await?;

        let district = self.require_district(district_id).await?;
        if self.repository.district_has_neighborhoods(district_id).await? {
            return Err(AppError::Conflict(format!(
                "district '{}' still has neighborhoods",
                district.name()
            )));
        }

        self.repository.delete_district(district_id).await
    }
}
