use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use relevar_core::UserIdentity;
use relevar_domain::{AccountStatus, RoleId, UserId};
use uuid::Uuid;

use crate::dto::{
    AssignUserRoleRequest, CreateUserRequest, EffectiveRoleResponse, RegisterUserRequest,
    RoleResponse, SaveRoleRequest, UpdateProfileRequest, UpdateUserStatusRequest, UserListQuery,
    UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod accounts;
mod roles;

pub use accounts::{
    assign_user_role_handler, create_user_handler, effective_role_handler, get_profile_handler,
    get_user_handler, list_users_handler, register_user_handler, update_profile_handler,
    update_user_status_handler,
};
pub use roles::{
    create_role_handler, delete_role_handler, list_roles_handler, update_role_handler,
};

#[cfg(test)]
mod tests;
