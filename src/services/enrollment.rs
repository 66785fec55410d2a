// src/services/enrollment.rs

use std::collections::HashSet;

use crate::{
    config::DEFAULT_ENROLLMENT_MODE,
    error::AppError,
    models::{course::Course, enrollment::Enrollment},
    store::Store,
    utils::session::Viewer,
};

/// Whether the viewer holds an enrollment in the course.
/// Anonymous viewers are never enrolled.
pub async fn check_if_enrolled(
    store: &dyn Store,
    viewer: &Viewer,
    course_id: i64,
) -> Result<bool, AppError> {
    let Some(user_id) = viewer.user_id() else {
        return Ok(false);
    };

    Ok(store.find_enrollment(user_id, course_id).await?.is_some())
}

/// Enrollment flags for a page of courses, in the same order, in one lookup.
pub async fn enrollment_flags(
    store: &dyn Store,
    viewer: &Viewer,
    courses: &[Course],
) -> Result<Vec<bool>, AppError> {
    let Some(user_id) = viewer.user_id() else {
        return Ok(vec![false; courses.len()]);
    };

    let ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
    let enrolled: HashSet<i64> = store
        .enrolled_course_ids(user_id, &ids)
        .await?
        .into_iter()
        .collect();

    Ok(courses.iter().map(|c| enrolled.contains(&c.id)).collect())
}

#[derive(Debug)]
pub enum EnrollOutcome {
    Enrolled(Enrollment),
    AlreadyEnrolled,
    Anonymous,
}

/// Enrolls the viewer in the course at most once.
///
/// The course must exist. Only a newly created enrollment moves the course's
/// `total_enrollment` counter.
pub async fn enroll(
    store: &dyn Store,
    viewer: &Viewer,
    course_id: i64,
) -> Result<EnrollOutcome, AppError> {
    store
        .find_course(course_id)
        .await?
        .ok_or(AppError::not_found("Course"))?;

    let Some(user_id) = viewer.user_id() else {
        return Ok(EnrollOutcome::Anonymous);
    };

    match store.enroll(user_id, course_id, DEFAULT_ENROLLMENT_MODE).await? {
        Some(enrollment) => {
            tracing::info!(user_id, course_id, "Enrolled user in course");
            Ok(EnrollOutcome::Enrolled(enrollment))
        }
        None => Ok(EnrollOutcome::AlreadyEnrolled),
    }
}
