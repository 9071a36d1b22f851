use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use relevar_core::UserIdentity;
use relevar_domain::{DepartmentId, DistrictId, NeighborhoodId};
use uuid::Uuid;

use crate::dto::{
    DepartmentResponse, DistrictListQuery, DistrictResponse, NeighborhoodListQuery,
    NeighborhoodResponse, SaveDepartmentRequest, SaveDistrictRequest, SaveNeighborhoodRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod departments;
mod districts;
mod neighborhoods;

pub use departments::{
    create_department_handler, delete_department_handler, get_department_handler,
    list_departments_handler, rename_department_handler,
};
pub use districts::{
    create_district_handler, delete_district_handler, get_district_handler,
    list_districts_handler, update_district_handler,
};
pub use neighborhoods::{
    create_neighborhood_handler, delete_neighborhood_handler, get_neighborhood_handler,
    list_neighborhoods_handler, update_neighborhood_handler,
};
