//! Sequential code assignment.
//!
//! Coded entities carry a positive integer that is unique within a scope.
//! New codes always take the lowest free slot, so gaps left by deleted
//! records are reused before the sequence grows.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use relevar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::AreaId;

/// Positive integer code unique within its [`CodeScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct EntityCode(u32);

impl EntityCode {
    /// Creates a validated code.
    pub fn new(value: u32) -> AppResult<Self> {
        if value == 0 {
            return Err(AppError::Validation(
                "code must be a positive integer".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Restores a code read back from storage.
    pub fn from_storage(value: i64) -> AppResult<Self> {
        let value = u32::try_from(value).map_err(|_| {
            AppError::Internal(format!("stored code '{value}' is out of range"))
        })?;
        Self::new(value).map_err(|_| AppError::Internal("stored code is zero".to_owned()))
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for EntityCode {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityCode> for u32 {
    fn from(value: EntityCode) -> Self {
        value.0
    }
}

impl Display for EntityCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Set of sibling records among which a code must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeScope {
    /// All departments.
    Departments,
    /// All districts.
    Districts,
    /// All neighborhoods.
    Neighborhoods,
    /// All areas.
    Areas,
    /// Objectives belonging to one area.
    Objectives(AreaId),
}

impl CodeScope {
    /// Returns the stable kind label of the scope.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Districts => "districts",
            Self::Neighborhoods => "neighborhoods",
            Self::Areas => "areas",
            Self::Objectives(_) => "objectives",
        }
    }

    /// Returns a key that identifies the scope, including its parent.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Objectives(area_id) => format!("objectives:{area_id}"),
            other => other.kind().to_owned(),
        }
    }
}

impl Display for CodeScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.key().as_str())
    }
}

/// Returns the smallest positive code not present in `existing`.
pub fn next_free_code<I>(existing: I) -> EntityCode
where
    I: IntoIterator<Item = EntityCode>,
{
    let used: BTreeSet<u32> = existing.into_iter().map(EntityCode::value).collect();

    let mut candidate = 1_u32;
    for value in used {
        if value > candidate {
            break;
        }
        if value == candidate {
            candidate = candidate.saturating_add(1);
        }
    }

    EntityCode(candidate)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::{CodeScope, EntityCode, next_free_code};
    use crate::AreaId;

    fn codes(values: &[u32]) -> Vec<EntityCode> {
        values
            .iter()
            .filter_map(|value| EntityCode::new(*value).ok())
            .collect()
    }

    #[test]
    fn empty_scope_starts_at_one() {
        assert_eq!(next_free_code(Vec::new()).value(), 1);
    }

    #[test]
    fn sequential_assignment_fills_one_to_n() {
        let mut assigned = Vec::new();
        for _ in 0..25 {
            let code = next_free_code(assigned.clone());
            assigned.push(code);
        }

        let values: Vec<u32> = assigned.iter().map(|code| code.value()).collect();
        assert_eq!(values, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn deleted_code_is_reused_before_growing() {
        let remaining = codes(&[1, 2, 4, 5]);
        assert_eq!(next_free_code(remaining).value(), 3);
    }

    #[test]
    fn unordered_input_with_duplicates_is_handled() {
        let existing = codes(&[5, 1, 3, 2, 2, 1]);
        assert_eq!(next_free_code(existing).value(), 4);
    }

    #[test]
    fn zero_is_not_a_valid_code() {
        assert!(EntityCode::new(0).is_err());
        assert!(EntityCode::from_storage(-4).is_err());
    }

    #[test]
    fn objective_scopes_are_keyed_by_area() {
        let first = CodeScope::Objectives(AreaId::new());
        let second = CodeScope::Objectives(AreaId::new());
        assert_ne!(first.key(), second.key());
        assert_eq!(first.kind(), "objectives");
        assert_eq!(CodeScope::Departments.key(), "departments");
    }

    proptest! {
        #[test]
        fn next_free_code_is_lowest_unused(values in prop::collection::vec(1_u32..200, 0..60)) {
            let existing = codes(&values);
            let used: BTreeSet<u32> = values.iter().copied().collect();
            let next = next_free_code(existing).value();

            prop_assert!(!used.contains(&next));
            prop_assert!((1..next).all(|value| used.contains(&value)));
        }
    }
}
