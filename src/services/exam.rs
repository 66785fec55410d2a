// src/services/exam.rs

use std::collections::{BTreeSet, HashSet};

use crate::{
    answers::extract_answers,
    error::AppError,
    grading::{ExamScore, grade_submission},
    models::{
        course::Course,
        question::{Choice, Question},
        submission::Submission,
    },
    store::Store,
    utils::session::Viewer,
};

/// Records one exam attempt for the viewer's enrollment in the course.
///
/// Missing course, anonymous viewer and missing enrollment all read as
/// not-found. Answers are parsed and checked against the course's choices
/// before anything is written.
pub async fn submit_exam(
    store: &dyn Store,
    viewer: &Viewer,
    course_id: i64,
    fields: &[(String, String)],
) -> Result<Submission, AppError> {
    store
        .find_course(course_id)
        .await?
        .ok_or(AppError::not_found("Course"))?;

    let user_id = viewer
        .user_id()
        .ok_or(AppError::not_found("Enrollment"))?;

    let enrollment = store
        .find_enrollment(user_id, course_id)
        .await?
        .ok_or(AppError::not_found("Enrollment"))?;

    let mut seen = HashSet::new();
    let selected: Vec<i64> = extract_answers(fields)?
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();

    let course_choices: HashSet<i64> = store
        .choices_for_course(course_id)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    if let Some(foreign) = selected.iter().find(|id| !course_choices.contains(*id)) {
        return Err(AppError::BadRequest(format!(
            "Choice {} does not belong to this course",
            foreign
        )));
    }

    let submission = store.create_submission(enrollment.id, &selected).await?;

    tracing::info!(
        submission_id = submission.id,
        enrollment_id = enrollment.id,
        selected = selected.len(),
        "Exam submitted"
    );

    Ok(submission)
}

#[derive(Debug)]
pub struct ExamResult {
    pub course: Course,
    pub submission: Submission,
    pub questions: Vec<Question>,
    pub choices: Vec<Choice>,
    pub score: ExamScore,
}

/// Loads a submission and grades it against the course's current questions.
/// The submission must belong to an enrollment in this course.
pub async fn exam_result(
    store: &dyn Store,
    course_id: i64,
    submission_id: i64,
) -> Result<ExamResult, AppError> {
    let course = store
        .find_course(course_id)
        .await?
        .ok_or(AppError::not_found("Course"))?;

    let submission = store
        .find_submission(submission_id)
        .await?
        .ok_or(AppError::not_found("Submission"))?;

    let enrollment = store
        .find_enrollment_by_id(submission.enrollment_id)
        .await?
        .ok_or(AppError::not_found("Submission"))?;

    if enrollment.course_id != course.id {
        return Err(AppError::not_found("Submission"));
    }

    let questions = store.questions_for_course(course_id).await?;
    let choices = store.choices_for_course(course_id).await?;
    let selected: BTreeSet<i64> = store
        .submission_choice_ids(submission.id)
        .await?
        .into_iter()
        .collect();

    let score = grade_submission(&questions, &choices, &selected);

    Ok(ExamResult {
        course,
        submission,
        questions,
        choices,
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        enrollment::enroll,
        test_support::{exam_course, store_with_course, viewer_for},
    };

    fn answers(ids: &[i64]) -> Vec<(String, String)> {
        ids.iter()
            .map(|id| (format!("choice_{id}"), id.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn unenrolled_submission_is_not_found_and_creates_nothing() {
        let (store, course_id) = store_with_course().await;
        let viewer = viewer_for(&store, "alice").await;

        let result = submit_exam(&store, &viewer, course_id, &answers(&[1, 3])).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.find_submission(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn anonymous_submission_is_not_found() {
        let (store, course_id) = store_with_course().await;
        let result = submit_exam(&store, &Viewer::anonymous(), course_id, &[]).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn submission_is_graded_all_or_nothing() {
        let (store, course_id) = store_with_course().await;
        let viewer = viewer_for(&store, "alice").await;
        enroll(&store, &viewer, course_id).await.unwrap();

        // A + C exactly: 5 points; X + Y: wrong on the 2-point question.
        let submission = submit_exam(&store, &viewer, course_id, &answers(&[1, 3, 4, 5]))
            .await
            .unwrap();
        let result = exam_result(&store, course_id, submission.id).await.unwrap();

        assert_eq!(result.score.total_score, 5);
        assert_eq!(result.score.possible_score, 7);
    }

    #[tokio::test]
    async fn partial_and_extra_picks_score_zero() {
        let (store, course_id) = store_with_course().await;
        let viewer = viewer_for(&store, "alice").await;
        enroll(&store, &viewer, course_id).await.unwrap();

        let only_a = submit_exam(&store, &viewer, course_id, &answers(&[1])).await.unwrap();
        let a_b_c = submit_exam(&store, &viewer, course_id, &answers(&[1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(exam_result(&store, course_id, only_a.id).await.unwrap().score.total_score, 0);
        assert_eq!(exam_result(&store, course_id, a_b_c.id).await.unwrap().score.total_score, 0);
    }

    #[tokio::test]
    async fn result_is_stable_across_reads() {
        let (store, course_id) = store_with_course().await;
        let viewer = viewer_for(&store, "alice").await;
        enroll(&store, &viewer, course_id).await.unwrap();
        let submission = submit_exam(&store, &viewer, course_id, &answers(&[1, 3, 4]))
            .await
            .unwrap();

        let first = exam_result(&store, course_id, submission.id).await.unwrap();
        let second = exam_result(&store, course_id, submission.id).await.unwrap();

        assert_eq!(first.score.total_score, 7);
        assert_eq!(first.score, second.score);
    }

    #[tokio::test]
    async fn duplicate_picks_are_collapsed() {
        let (store, course_id) = store_with_course().await;
        let viewer = viewer_for(&store, "alice").await;
        enroll(&store, &viewer, course_id).await.unwrap();

        let submission = submit_exam(&store, &viewer, course_id, &answers(&[1, 1, 3]))
            .await
            .unwrap();

        assert_eq!(store.submission_choice_ids(submission.id).await.unwrap(), vec![1, 3]);
    }

    #[tokio::test]
    async fn malformed_choice_is_bad_request() {
        let (store, course_id) = store_with_course().await;
        let viewer = viewer_for(&store, "alice").await;
        enroll(&store, &viewer, course_id).await.unwrap();

        let fields = vec![("choice_1".to_string(), "first".to_string())];
        let result = submit_exam(&store, &viewer, course_id, &fields).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(store.find_submission(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn choice_from_another_course_is_rejected() {
        let (store, course_id) = store_with_course().await;
        // Second course owns choice ids 6..=10.
        store.import_course(&exam_course("Go")).await.unwrap();
        let viewer = viewer_for(&store, "alice").await;
        enroll(&store, &viewer, course_id).await.unwrap();

        let result = submit_exam(&store, &viewer, course_id, &answers(&[1, 6])).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn result_under_wrong_course_is_not_found() {
        let (store, course_id) = store_with_course().await;
        let other = store.import_course(&exam_course("Go")).await.unwrap();
        let viewer = viewer_for(&store, "alice").await;
        enroll(&store, &viewer, course_id).await.unwrap();
        let submission = submit_exam(&store, &viewer, course_id, &answers(&[1])).await.unwrap();

        let result = exam_result(&store, other, submission.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let missing = exam_result(&store, course_id, 999).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
