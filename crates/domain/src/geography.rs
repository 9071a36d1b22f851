use std::str::FromStr;

use relevar_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{DepartmentId, DistrictId, EntityCode, NeighborhoodId};

/// Top-level administrative division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    name: NonEmptyString,
    code: EntityCode,
}

impl Department {
    /// Creates a department with a validated name.
    pub fn new(id: DepartmentId, name: impl Into<String>, code: EntityCode) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("department name", name)?,
            code,
        })
    }

    /// Returns the department identifier.
    #[must_use]
    pub fn id(&self) -> DepartmentId {
        self.id
    }

    /// Returns the department name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the assigned code.
    #[must_use]
    pub fn code(&self) -> EntityCode {
        self.code
    }

    /// Renames the department. The code never changes.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = NonEmptyString::for_field("department name", name)?;
        Ok(())
    }
}

/// Division of a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    id: DistrictId,
    department_id: DepartmentId,
    name: NonEmptyString,
    code: EntityCode,
}

impl District {
    /// Creates a district inside a department.
    pub fn new(
        id: DistrictId,
        department_id: DepartmentId,
        name: impl Into<String>,
        code: EntityCode,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            department_id,
            name: NonEmptyString::for_field("district name", name)?,
            code,
        })
    }

    /// Returns the district identifier.
    #[must_use]
    pub fn id(&self) -> DistrictId {
        self.id
    }

    /// Returns the parent department.
    #[must_use]
    pub fn department_id(&self) -> DepartmentId {
        self.department_id
    }

    /// Returns the district name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the assigned code.
    #[must_use]
    pub fn code(&self) -> EntityCode {
        self.code
    }

    /// Renames the district and optionally moves it to another department.
    pub fn update(&mut self, name: impl Into<String>, department_id: DepartmentId) -> AppResult<()> {
        self.name = NonEmptyString::for_field("district name", name)?;
        self.department_id = department_id;
        Ok(())
    }
}

/// Lifecycle marker of a neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborhoodStatus {
    /// Neighborhood is in use.
    Active,
    /// Neighborhood is retired from planning.
    Inactive,
}

impl NeighborhoodStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for NeighborhoodStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown neighborhood status '{value}'"
            ))),
        }
    }
}

/// Settlement surveyed in the field. May span several districts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    id: NeighborhoodId,
    name: NonEmptyString,
    code: EntityCode,
    status: NeighborhoodStatus,
    parent_property: Option<String>,
    parent_registry: Option<String>,
    district_ids: Vec<DistrictId>,
}

impl Neighborhood {
    /// Creates a neighborhood linked to at least one district.
    pub fn new(
        id: NeighborhoodId,
        name: impl Into<String>,
        code: EntityCode,
        status: NeighborhoodStatus,
        parent_property: Option<String>,
        parent_registry: Option<String>,
        district_ids: Vec<DistrictId>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("neighborhood name", name)?,
            code,
            status,
            parent_property: normalize_optional(parent_property),
            parent_registry: normalize_optional(parent_registry),
            district_ids: normalize_districts(district_ids)?,
        })
    }

    /// Returns the neighborhood identifier.
    #[must_use]
    pub fn id(&self) -> NeighborhoodId {
        self.id
    }

    /// Returns the neighborhood name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the assigned code.
    #[must_use]
    pub fn code(&self) -> EntityCode {
        self.code
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> NeighborhoodStatus {
        self.status
    }

    /// Returns the parent property reference (finca matriz).
    #[must_use]
    pub fn parent_property(&self) -> Option<&str> {
        self.parent_property.as_deref()
    }

    /// Returns the parent registry reference (padrón matriz).
    #[must_use]
    pub fn parent_registry(&self) -> Option<&str> {
        self.parent_registry.as_deref()
    }

    /// Returns the linked districts, sorted and deduplicated.
    #[must_use]
    pub fn district_ids(&self) -> &[DistrictId] {
        &self.district_ids
    }

    /// Replaces the editable attributes. The code never changes.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        status: NeighborhoodStatus,
        parent_property: Option<String>,
        parent_registry: Option<String>,
        district_ids: Vec<DistrictId>,
    ) -> AppResult<()> {
        let name = NonEmptyString::for_field("neighborhood name", name)?;
        let district_ids = normalize_districts(district_ids)?;

        self.name = name;
        self.status = status;
        self.parent_property = normalize_optional(parent_property);
        self.parent_registry = normalize_optional(parent_registry);
        self.district_ids = district_ids;
        Ok(())
    }
}

fn normalize_districts(mut district_ids: Vec<DistrictId>) -> AppResult<Vec<DistrictId>> {
    district_ids.sort();
    district_ids.dedup();

    if district_ids.is_empty() {
        return Err(AppError::Validation(
            "a neighborhood must be linked to at least one district".to_owned(),
        ));
    }

    Ok(district_ids)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(value: u32) -> EntityCode {
        EntityCode::new(value).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn neighborhood_requires_a_district() {
        let result = Neighborhood::new(
            NeighborhoodId::new(),
            "San Roque",
            code(1),
            NeighborhoodStatus::Active,
            None,
            None,
            Vec::new(),
        );

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn neighborhood_deduplicates_districts_and_blanks() {
        let district = DistrictId::new();
        let neighborhood = Neighborhood::new(
            NeighborhoodId::new(),
            " San Roque ",
            code(4),
            NeighborhoodStatus::Active,
            Some("   ".to_owned()),
            Some("P-12".to_owned()),
            vec![district, district],
        );

        assert!(neighborhood.is_ok());
        let Ok(neighborhood) = neighborhood else {
            return;
        };
        assert_eq!(neighborhood.name().as_str(), "San Roque");
        assert_eq!(neighborhood.district_ids(), &[district]);
        assert_eq!(neighborhood.parent_property(), None);
        assert_eq!(neighborhood.parent_registry(), Some("P-12"));
    }

    #[test]
    fn renaming_keeps_the_code() {
        let department = Department::new(DepartmentId::new(), "Central", code(7));
        assert!(department.is_ok());
        let Ok(mut department) = department else {
            return;
        };

        assert!(department.rename("Capital").is_ok());
        assert_eq!(department.code().value(), 7);
        assert!(department.rename(" ").is_err());
        assert_eq!(department.name().as_str(), "Capital");
    }

    #[test]
    fn neighborhood_status_parses_storage_values() {
        assert_eq!(
            "inactive".parse::<NeighborhoodStatus>().ok(),
            Some(NeighborhoodStatus::Inactive)
        );
        assert!("closed".parse::<NeighborhoodStatus>().is_err());
    }
}
