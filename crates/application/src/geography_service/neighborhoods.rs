use super::*;

use crate::geography_ports::{NeighborhoodFilter, SaveNeighborhoodInput};

impl GeographyService {
    /// Lists neighborhoods matching the filter.
    pub async fn list_neighborhoods(
        &self,
        filter: NeighborhoodFilter,
    ) -> AppResult<Vec<Neighborhood>> {
        let filter = NeighborhoodFilter {
            name_contains: filter
                .name_contains
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
            ..filter
        };

        self.repository.list_neighborhoods(filter).await
    }

    /// Returns one neighborhood.
    pub async fn get_neighborhood(&self, neighborhood_id: NeighborhoodId) -> AppResult<Neighborhood> {
        self.require_neighborhood(neighborhood_id).await
    }

    /// Creates a neighborhood linked to existing districts.
    pub async fn create_neighborhood(
        &self,
        actor: &UserIdentity,
        input: SaveNeighborhoodInput,
    ) -> AppResult<Neighborhood> {
        self.require_geography_manage(actor).await?;
        self.require_districts(&input.district_ids).await?;

        insert_with_next_code(self.repository.as_ref(), CodeScope::Neighborhoods, |code| {
            Neighborhood::new(
                NeighborhoodId::new(),
                input.name.as_str(),
                code,
                input.status,
                input.parent_property.clone(),
                input.parent_registry.clone(),
                input.district_ids.clone(),
            )
        })
        .await
    }

    /// Replaces the editable attributes of a neighborhood.
    pub async fn update_neighborhood(
        &self,
        actor: &UserIdentity,
        neighborhood_id: NeighborhoodId,
        input: SaveNeighborhoodInput,
    ) -> AppResult<Neighborhood> {
        self.require_geography_manage(actor).await?;

        let mut neighborhood = self.require_neighborhood(neighborhood_id).await?;
        self.require_districts(&input.district_ids).await?;
        neighborhood.update(
            input.name,
            input.status,
            input.parent_property,
            input.parent_registry,
            input.district_ids,
        )?;

        self.repository.update_neighborhood(&neighborhood).await?;
        Ok(neighborhood)
    }

    /// Deletes a neighborhood without requests or surveys.
    pub async fn delete_neighborhood(
        &self,
        actor: &UserIdentity,
        neighborhood_id: NeighborhoodId,
    ) -> AppResult<()> {
        self.require_geography_manage(actor).await?;

        let neighborhood = self.require_neighborhood(neighborhood_id).await?;
        if self
            .repository
            .neighborhood_has_activity(neighborhood_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "neighborhood '{}' has requests or surveys",
                neighborhood.name()
            )));
        }

        self.repository.delete_neighborhood(neighborhood_id).await
    }

    async fn require_districts(&self, district_ids: &[DistrictId]) -> AppResult<()> {
        for district_id in district_ids {
            self.require_district(*district_id).await?;
        }

        Ok(())
    }
}
