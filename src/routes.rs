// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, courses, exam},
    state::AppState,
};

pub const INDEX_PATH: &str = "/";

pub fn course_path(course_id: i64) -> String {
    format!("/courses/{course_id}")
}

pub fn exam_result_path(course_id: i64, submission_id: i64) -> String {
    format!("/courses/{course_id}/submissions/{submission_id}/result")
}

/// Assembles the main application router.
///
/// * Account routes (registration, login, logout).
/// * Course routes (listing, detail, enroll, exam submit and result).
/// * Global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let account_routes = Router::<AppState>::new()
        .route(
            "/registration",
            get(auth::registration_page).post(auth::register),
        )
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout));

    let course_routes = Router::<AppState>::new()
        .route("/{course_id}", get(courses::course_detail))
        .route(
            "/{course_id}/enroll",
            get(courses::enroll).post(courses::enroll),
        )
        .route("/{course_id}/submit", post(exam::submit))
        .route(
            "/{course_id}/submissions/{submission_id}/result",
            get(exam::show_exam_result),
        );

    Router::new()
        .route(INDEX_PATH, get(courses::list_courses))
        .merge(account_routes)
        .nest("/courses", course_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
