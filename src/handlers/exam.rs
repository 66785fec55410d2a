// src/handlers/exam.rs

use axum::{
    Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::{
    error::AppError,
    routes::exam_result_path,
    services::exam,
    store::SharedStore,
    utils::session::Viewer,
    views::ExamResultPage,
};

/// Records an exam attempt from the submitted `choice*` form fields.
///
/// Fields are taken as ordered pairs so repeated keys (checkbox groups)
/// all survive.
pub async fn submit(
    State(store): State<SharedStore>,
    viewer: Viewer,
    Path(course_id): Path<i64>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let submission = exam::submit_exam(store.as_ref(), &viewer, course_id, &fields).await?;

    Ok(Redirect::to(&exam_result_path(course_id, submission.id)))
}

/// Grades the submission and renders the score.
pub async fn show_exam_result(
    State(store): State<SharedStore>,
    viewer: Viewer,
    Path((course_id, submission_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let result = exam::exam_result(store.as_ref(), course_id, submission_id).await?;

    Ok(Json(ExamResultPage::new(&viewer, result)))
}
