use std::str::FromStr;

use relevar_application::{CreateDistrictInput, NeighborhoodFilter, SaveNeighborhoodInput};
use relevar_core::AppError;
use relevar_domain::{
    Department, DepartmentId, District, DistrictId, Neighborhood, NeighborhoodStatus,
};

use super::{
    DepartmentResponse, DistrictResponse, NeighborhoodListQuery, NeighborhoodResponse,
    SaveDistrictRequest, SaveNeighborhoodRequest,
};

impl From<SaveDistrictRequest> for CreateDistrictInput {
    fn from(value: SaveDistrictRequest) -> Self {
        Self {
            name: value.name,
            department_id: DepartmentId::from_uuid(value.department_id),
        }
    }
}

impl TryFrom<SaveNeighborhoodRequest> for SaveNeighborhoodInput {
    type Error = AppError;

    fn try_from(value: SaveNeighborhoodRequest) -> Result<Self, Self::Error> {
        let status = value
            .status
            .as_deref()
            .map(NeighborhoodStatus::from_str)
            .transpose()?
            .unwrap_or(NeighborhoodStatus::Active);

        Ok(Self {
            name: value.name,
            status,
            parent_property: value.parent_property,
            parent_registry: value.parent_registry,
            district_ids: value
                .district_ids
                .into_iter()
                .map(DistrictId::from_uuid)
                .collect(),
        })
    }
}

impl TryFrom<NeighborhoodListQuery> for NeighborhoodFilter {
    type Error = AppError;

    fn try_from(value: NeighborhoodListQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            name_contains: value.name,
            status: value
                .status
                .as_deref()
                .map(NeighborhoodStatus::from_str)
                .transpose()?,
            district_id: value.district_id.map(DistrictId::from_uuid),
        })
    }
}

impl From<Department> for DepartmentResponse {
    fn from(value: Department) -> Self {
        Self {
            department_id: value.id().to_string(),
            code: value.code().value(),
            name: value.name().as_str().to_owned(),
        }
    }
}

impl From<District> for DistrictResponse {
    fn from(value: District) -> Self {
        Self {
            district_id: value.id().to_string(),
            department_id: value.department_id().to_string(),
            code: value.code().value(),
            name: value.name().as_str().to_owned(),
        }
    }
}

impl From<Neighborhood> for NeighborhoodResponse {
    fn from(value: Neighborhood) -> Self {
        Self {
            neighborhood_id: value.id().to_string(),
            code: value.code().value(),
            name: value.name().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            parent_property: value.parent_property().map(ToOwned::to_owned),
            parent_registry: value.parent_registry().map(ToOwned::to_owned),
            district_ids: value
                .district_ids()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
