use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use relevar_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    Ok(routes(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer))
}

fn routes(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/departments",
            get(handlers::geography::list_departments_handler)
                .post(handlers::geography::create_department_handler),
        )
        .route(
            "/api/departments/{department_id}",
            get(handlers::geography::get_department_handler)
                .put(handlers::geography::rename_department_handler)
                .delete(handlers::geography::delete_department_handler),
        )
        .route(
            "/api/districts",
            get(handlers::geography::list_districts_handler)
                .post(handlers::geography::create_district_handler),
        )
        .route(
            "/api/districts/{district_id}",
            get(handlers::geography::get_district_handler)
                .put(handlers::geography::update_district_handler)
                .delete(handlers::geography::delete_district_handler),
        )
        .route(
            "/api/neighborhoods",
            get(handlers::geography::list_neighborhoods_handler)
                .post(handlers::geography::create_neighborhood_handler),
        )
        .route(
            "/api/neighborhoods/{neighborhood_id}",
            get(handlers::geography::get_neighborhood_handler)
                .put(handlers::geography::update_neighborhood_handler)
                .delete(handlers::geography::delete_neighborhood_handler),
        )
        .route(
            "/api/areas",
            get(handlers::areas::list_areas_handler).post(handlers::areas::create_area_handler),
        )
        .route(
            "/api/areas/{area_id}",
            get(handlers::areas::get_area_handler).delete(handlers::areas::delete_area_handler),
        )
        .route(
            "/api/areas/{area_id}/objectives",
            get(handlers::areas::list_objectives_handler)
                .post(handlers::areas::create_objective_handler),
        )
        .route(
            "/api/objectives/{objective_id}",
            delete(handlers::areas::delete_objective_handler),
        )
        .route(
            "/api/requests",
            get(handlers::requests::list_requests_handler)
                .post(handlers::requests::create_request_handler),
        )
        .route(
            "/api/requests/{request_id}",
            get(handlers::requests::get_request_handler),
        )
        .route(
            "/api/requests/{request_id}/notes",
            put(handlers::requests::update_request_notes_handler),
        )
        .route(
            "/api/requests/{request_id}/transitions",
            post(handlers::requests::transition_request_handler),
        )
        .route(
            "/api/requests/{request_id}/audit",
            get(handlers::requests::list_request_audit_handler),
        )
        .route(
            "/api/surveys",
            get(handlers::surveys::list_surveys_handler)
                .post(handlers::surveys::record_survey_handler),
        )
        .route(
            "/api/surveys/{survey_id}",
            get(handlers::surveys::get_survey_handler),
        )
        .route(
            "/api/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/api/users/me",
            get(handlers::users::get_profile_handler).put(handlers::users::update_profile_handler),
        )
        .route("/api/users/{user_id}", get(handlers::users::get_user_handler))
        .route(
            "/api/users/{user_id}/status",
            put(handlers::users::update_user_status_handler),
        )
        .route(
            "/api/users/{user_id}/role",
            put(handlers::users::assign_user_role_handler),
        )
        .route(
            "/api/users/{user_id}/effective-role",
            get(handlers::users::effective_role_handler),
        )
        .route(
            "/api/roles",
            get(handlers::users::list_roles_handler).post(handlers::users::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            put(handlers::users::update_role_handler).delete(handlers::users::delete_role_handler),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications_handler)
                .delete(handlers::notifications::delete_all_notifications_handler),
        )
        .route(
            "/api/notifications/unread-count",
            get(handlers::notifications::unread_count_handler),
        )
        .route(
            "/api/notifications/mark-all-read",
            post(handlers::notifications::mark_all_read_handler),
        )
        .route(
            "/api/notifications/delete-selected",
            post(handlers::notifications::delete_selected_notifications_handler),
        )
        .route(
            "/api/notifications/{notification_id}",
            delete(handlers::notifications::delete_notification_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_identity,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/users/register",
            post(handlers::users::register_user_handler),
        )
        .merge(protected_routes)
        .with_state(app_state)
}
