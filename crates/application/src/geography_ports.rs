mod codes;
mod inputs;
mod repositories;

pub use codes::{CodeRegistry, CodedInsert, InsertOutcome};
pub use inputs::{
    AreaInput, CreateDistrictInput, NeighborhoodFilter, ObjectiveInput, SaveNeighborhoodInput,
    UpdateDistrictInput,
};
pub use repositories::{AreaRepository, GeographyRepository};
