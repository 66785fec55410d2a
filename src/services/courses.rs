// src/services/courses.rs

use crate::{
    config::COURSE_LIST_LIMIT,
    error::AppError,
    models::{
        course::Course,
        question::{Choice, Question},
    },
    services::enrollment::{check_if_enrolled, enrollment_flags},
    store::Store,
    utils::session::Viewer,
};

#[derive(Debug)]
pub struct ListedCourse {
    pub course: Course,
    pub is_enrolled: bool,
}

/// The most popular courses, each flagged with the viewer's enrollment.
pub async fn list_courses(store: &dyn Store, viewer: &Viewer) -> Result<Vec<ListedCourse>, AppError> {
    let courses = store.top_courses(COURSE_LIST_LIMIT).await?;
    let flags = enrollment_flags(store, viewer, &courses).await?;

    Ok(courses
        .into_iter()
        .zip(flags)
        .map(|(course, is_enrolled)| ListedCourse {
            course,
            is_enrolled,
        })
        .collect())
}

#[derive(Debug)]
pub struct CourseDetail {
    pub course: Course,
    pub is_enrolled: bool,
    /// Empty unless the viewer is enrolled.
    pub questions: Vec<Question>,
    pub choices: Vec<Choice>,
}

pub async fn course_detail(
    store: &dyn Store,
    viewer: &Viewer,
    course_id: i64,
) -> Result<CourseDetail, AppError> {
    let course = store
        .find_course(course_id)
        .await?
        .ok_or(AppError::not_found("Course"))?;

    let is_enrolled = check_if_enrolled(store, viewer, course_id).await?;

    let (questions, choices) = if is_enrolled {
        (
            store.questions_for_course(course_id).await?,
            store.choices_for_course(course_id).await?,
        )
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(CourseDetail {
        course,
        is_enrolled,
        questions,
        choices,
    })
}
