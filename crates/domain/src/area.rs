use relevar_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{AreaId, EntityCode, ObjectiveId};

/// Planning area grouping objectives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    id: AreaId,
    name: NonEmptyString,
    description: String,
    code: EntityCode,
}

impl Area {
    /// Creates an area with a validated name.
    pub fn new(
        id: AreaId,
        name: impl Into<String>,
        description: impl Into<String>,
        code: EntityCode,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("area name", name)?,
            description: description.into().trim().to_owned(),
            code,
        })
    }

    /// Returns the area identifier.
    #[must_use]
    pub fn id(&self) -> AreaId {
        self.id
    }

    /// Returns the area name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the assigned code.
    #[must_use]
    pub fn code(&self) -> EntityCode {
        self.code
    }

    /// Display label in the `code - name` form.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Objective inside an area. Its code is unique only within that area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    id: ObjectiveId,
    area_id: AreaId,
    name: NonEmptyString,
    description: String,
    code: EntityCode,
}

impl Objective {
    /// Creates an objective inside an area.
    pub fn new(
        id: ObjectiveId,
        area_id: AreaId,
        name: impl Into<String>,
        description: impl Into<String>,
        code: EntityCode,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            area_id,
            name: NonEmptyString::for_field("objective name", name)?,
            description: description.into().trim().to_owned(),
            code,
        })
    }

    /// Returns the objective identifier.
    #[must_use]
    pub fn id(&self) -> ObjectiveId {
        self.id
    }

    /// Returns the owning area.
    #[must_use]
    pub fn area_id(&self) -> AreaId {
        self.area_id
    }

    /// Returns the objective name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the assigned code.
    #[must_use]
    pub fn code(&self) -> EntityCode {
        self.code
    }
}
