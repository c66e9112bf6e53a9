pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod utils;
pub mod validation;

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware as app_middleware;
use config::Config;
use db::connection::DbPool;

/// Builds the full application router. Shared between `main` and the
/// integration tests.
pub fn app(pool: DbPool, config: Config) -> Router {
    let state = (pool.clone(), config.clone());

    // Public routes (no auth)
    let public_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route(
            "/api/auth/forgot-password",
            post(handlers::auth::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(handlers::auth::reset_password),
        );

    // Routes open to every authenticated employee
    let shared_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route(
            "/api/auth/change-password",
            put(handlers::auth::change_password),
        )
        .route(
            "/api/employees/profile",
            get(handlers::employees::get_profile).put(handlers::employees::update_profile),
        )
        .route("/api/checkin/in", post(handlers::checkin::check_in))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth::auth_any,
        ));

    let teacher_routes = Router::new()
        .route("/api/classes/mine", get(handlers::classes::my_sessions))
        .route(
            "/api/attendance/{id}",
            put(handlers::attendance::mark_attendance),
        )
        .route(
            "/api/evaluations",
            post(handlers::evaluations::create_evaluation),
        )
        .route(
            "/api/evaluations/{id}",
            put(handlers::evaluations::update_evaluation),
        )
        .route(
            "/api/leave-requests",
            post(handlers::leave_requests::create_leave_request),
        )
        .route(
            "/api/leave-requests/mine",
            get(handlers::leave_requests::my_leave_requests),
        )
        .route(
            "/api/leave-requests/{id}",
            put(handlers::leave_requests::update_leave_request),
        )
        .route("/api/issues", post(handlers::issues::create_issue))
        .route("/api/issues/mine", get(handlers::issues::my_issues))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth::auth_teacher,
        ));

    let advisor_routes = Router::new()
        .route("/api/students", post(handlers::students::create_student))
        .route(
            "/api/students/{id}",
            put(handlers::students::update_student).delete(handlers::students::delete_student),
        )
        .route(
            "/api/courses",
            get(handlers::courses::list_my_courses).post(handlers::courses::create_course),
        )
        .route(
            "/api/courses/{id}",
            get(handlers::courses::get_my_course)
                .put(handlers::courses::update_course)
                .delete(handlers::courses::delete_course),
        )
        .route("/api/classes", post(handlers::classes::create_session))
        .route(
            "/api/classes/{id}",
            put(handlers::classes::update_session).delete(handlers::classes::delete_session),
        )
        .route(
            "/api/contracts",
            get(handlers::contracts::list_my_contracts)
                .post(handlers::contracts::create_contract),
        )
        .route(
            "/api/contracts/{id}",
            get(handlers::contracts::get_my_contract)
                .put(handlers::contracts::update_contract)
                .delete(handlers::contracts::delete_contract),
        )
        .route(
            "/api/enrolments",
            post(handlers::enrolments::create_enrolment),
        )
        .route(
            "/api/enrolments/{id}",
            delete(handlers::enrolments::delete_enrolment),
        )
        .route(
            "/api/attendance",
            post(handlers::attendance::create_attendance),
        )
        .route(
            "/api/attendance/{id}",
            delete(handlers::attendance::delete_attendance),
        )
        .route(
            "/api/makeup-classes",
            get(handlers::makeup_classes::list_makeup_classes)
                .post(handlers::makeup_classes::create_makeup_class),
        )
        .route(
            "/api/makeup-classes/{id}",
            delete(handlers::makeup_classes::delete_makeup_class),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth::auth_advisor,
        ));

    // Advisor or Manager
    let staff_routes = Router::new()
        .route("/api/students", get(handlers::students::list_students))
        .route("/api/students/{id}", get(handlers::students::get_student))
        .route("/api/classes", get(handlers::classes::list_sessions))
        .route("/api/classes/{id}", get(handlers::classes::get_session))
        .route("/api/enrolments", get(handlers::enrolments::list_enrolments))
        .route(
            "/api/attendance/export",
            get(handlers::attendance::export_attendance),
        )
        .route(
            "/api/evaluations/export",
            get(handlers::evaluations::export_evaluations),
        )
        .route("/api/rooms", get(handlers::rooms::list_rooms))
        .route("/api/issues", get(handlers::issues::list_issues))
        .route(
            "/api/issues/{id}",
            put(handlers::issues::update_issue).delete(handlers::issues::delete_issue),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth::auth_staff,
        ));

    // Teacher or Advisor
    let teaching_routes = Router::new()
        .route(
            "/api/attendance/session/{session_id}",
            get(handlers::attendance::session_attendance),
        )
        .route(
            "/api/evaluations/student/{student_id}",
            get(handlers::evaluations::student_evaluations),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth::auth_teacher_or_advisor,
        ));

    // Teacher or Manager
    let review_routes = Router::new()
        .route(
            "/api/leave-requests/{id}",
            get(handlers::leave_requests::get_leave_request),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth::auth_teacher_or_manager,
        ));

    let manager_routes = Router::new()
        .route(
            "/api/employees",
            get(handlers::employees::list_employees).post(handlers::employees::create_employee),
        )
        .route(
            "/api/employees/{id}",
            get(handlers::employees::get_employee)
                .put(handlers::employees::update_employee)
                .delete(handlers::employees::delete_employee),
        )
        .route("/api/courses/all", get(handlers::courses::list_all_courses))
        .route(
            "/api/courses/all/{id}",
            get(handlers::courses::get_any_course),
        )
        .route(
            "/api/contracts/all",
            get(handlers::contracts::list_all_contracts),
        )
        .route(
            "/api/contracts/all/{id}",
            get(handlers::contracts::get_any_contract),
        )
        .route(
            "/api/leave-requests",
            get(handlers::leave_requests::list_leave_requests),
        )
        .route(
            "/api/leave-requests/{id}/approve",
            put(handlers::leave_requests::approve_leave_request),
        )
        .route("/api/rooms", post(handlers::rooms::create_room))
        .route(
            "/api/rooms/{id}",
            put(handlers::rooms::update_room).delete(handlers::rooms::delete_room),
        )
        .route("/api/checkin/out", put(handlers::checkin::check_out))
        .route(
            "/api/checkin/today",
            get(handlers::checkin::today_checkins),
        )
        .route(
            "/api/dashboard/statistics",
            get(handlers::dashboard::statistics),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth::auth_manager,
        ));

    Router::new()
        .merge(public_routes)
        .merge(shared_routes)
        .merge(teacher_routes)
        .merge(advisor_routes)
        .merge(staff_routes)
        .merge(teaching_routes)
        .merge(review_routes)
        .merge(manager_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(
                    app_middleware::request_id::propagate_request_id,
                ))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state)
}
