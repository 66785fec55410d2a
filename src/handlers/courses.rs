// src/handlers/courses.rs

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::{
    error::AppError,
    routes::course_path,
    services::{courses, enrollment},
    store::SharedStore,
    utils::session::Viewer,
    views::{CourseDetailPage, CourseListPage},
};

/// Index page: the ten most enrolled courses.
pub async fn list_courses(
    State(store): State<SharedStore>,
    viewer: Viewer,
) -> Result<impl IntoResponse, AppError> {
    let listed = courses::list_courses(store.as_ref(), &viewer).await?;

    Ok(Json(CourseListPage::new(&viewer, listed)))
}

/// Retrieves a single course by ID.
pub async fn course_detail(
    State(store): State<SharedStore>,
    viewer: Viewer,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let detail = courses::course_detail(store.as_ref(), &viewer, course_id).await?;

    Ok(Json(CourseDetailPage::new(&viewer, detail)))
}

/// Enrolls the viewer (if logged in and not yet enrolled), then shows the course.
pub async fn enroll(
    State(store): State<SharedStore>,
    viewer: Viewer,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    enrollment::enroll(store.as_ref(), &viewer, course_id).await?;

    Ok(Redirect::to(&course_path(course_id)))
}
