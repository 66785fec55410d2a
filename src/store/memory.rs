// src/store/memory.rs

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::Store;
use crate::{
    error::AppError,
    models::{
        course::Course,
        enrollment::{Enrollment, EnrollmentMode},
        question::{Choice, Question},
        submission::Submission,
        user::{NewUser, User},
    },
    seed::CourseSeed,
};

/// In-process store used by the test suite and when no database is configured.
/// Ids are assigned sequentially per table, starting at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    courses: Vec<Course>,
    enrollments: Vec<Enrollment>,
    questions: Vec<Question>,
    choices: Vec<Choice>,
    submissions: Vec<Submission>,
    /// (submission_id, choice_id)
    submission_choices: BTreeSet<(i64, i64)>,
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == new_user.username) {
            return Ok(None);
        }

        let user = User {
            id: next_id(tables.users.len()),
            username: new_user.username,
            password: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(Some(user))
    }

    async fn top_courses(&self, limit: i64) -> Result<Vec<Course>, AppError> {
        let tables = self.tables.read().await;
        let mut courses = tables.courses.clone();
        courses.sort_by(|a, b| {
            b.total_enrollment
                .cmp(&a.total_enrollment)
                .then(a.id.cmp(&b.id))
        });
        courses.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(courses)
    }

    async fn find_course(&self, course_id: i64) -> Result<Option<Course>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.courses.iter().find(|c| c.id == course_id).cloned())
    }

    async fn count_courses(&self) -> Result<i64, AppError> {
        Ok(self.tables.read().await.courses.len() as i64)
    }

    async fn find_enrollment(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .cloned())
    }

    async fn find_enrollment_by_id(
        &self,
        enrollment_id: i64,
    ) -> Result<Option<Enrollment>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .find(|e| e.id == enrollment_id)
            .cloned())
    }

    async fn enrolled_course_ids(
        &self,
        user_id: i64,
        course_ids: &[i64],
    ) -> Result<Vec<i64>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id && course_ids.contains(&e.course_id))
            .map(|e| e.course_id)
            .collect())
    }

    async fn enroll(
        &self,
        user_id: i64,
        course_id: i64,
        mode: EnrollmentMode,
    ) -> Result<Option<Enrollment>, AppError> {
        // The write lock covers check, insert and increment.
        let mut tables = self.tables.write().await;

        if tables
            .enrollments
            .iter()
            .any(|e| e.user_id == user_id && e.course_id == course_id)
        {
            return Ok(None);
        }

        let Some(course) = tables.courses.iter_mut().find(|c| c.id == course_id) else {
            return Err(AppError::not_found("Course"));
        };
        course.total_enrollment += 1;

        let enrollment = Enrollment {
            id: next_id(tables.enrollments.len()),
            user_id,
            course_id,
            mode: mode.as_str().to_string(),
            date_enrolled: Utc::now(),
        };
        tables.enrollments.push(enrollment.clone());
        Ok(Some(enrollment))
    }

    async fn questions_for_course(&self, course_id: i64) -> Result<Vec<Question>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn choices_for_course(&self, course_id: i64) -> Result<Vec<Choice>, AppError> {
        let tables = self.tables.read().await;
        let question_ids: BTreeSet<i64> = tables
            .questions
            .iter()
            .filter(|q| q.course_id == course_id)
            .map(|q| q.id)
            .collect();

        Ok(tables
            .choices
            .iter()
            .filter(|c| question_ids.contains(&c.question_id))
            .cloned()
            .collect())
    }

    async fn create_submission(
        &self,
        enrollment_id: i64,
        choice_ids: &[i64],
    ) -> Result<Submission, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.enrollments.iter().any(|e| e.id == enrollment_id) {
            return Err(AppError::not_found("Enrollment"));
        }
        if let Some(missing) = choice_ids
            .iter()
            .find(|id| !tables.choices.iter().any(|c| c.id == **id))
        {
            return Err(AppError::BadRequest(format!("Unknown choice {}", missing)));
        }

        let submission = Submission {
            id: next_id(tables.submissions.len()),
            enrollment_id,
            created_at: Utc::now(),
        };
        for choice_id in choice_ids {
            tables.submission_choices.insert((submission.id, *choice_id));
        }
        tables.submissions.push(submission.clone());
        Ok(submission)
    }

    async fn find_submission(&self, submission_id: i64) -> Result<Option<Submission>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .iter()
            .find(|s| s.id == submission_id)
            .cloned())
    }

    async fn submission_choice_ids(&self, submission_id: i64) -> Result<Vec<i64>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .submission_choices
            .range((submission_id, i64::MIN)..=(submission_id, i64::MAX))
            .map(|(_, choice_id)| *choice_id)
            .collect())
    }

    async fn import_course(&self, seed: &CourseSeed) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;

        let course_id = next_id(tables.courses.len());
        tables.courses.push(Course {
            id: course_id,
            name: seed.name.clone(),
            description: seed.description.clone(),
            total_enrollment: seed.total_enrollment,
            created_at: Utc::now(),
        });

        for question in &seed.questions {
            let question_id = next_id(tables.questions.len());
            tables.questions.push(Question {
                id: question_id,
                course_id,
                content: question.content.clone(),
                grade: question.grade,
            });

            for choice in &question.choices {
                let choice_id = next_id(tables.choices.len());
                tables.choices.push(Choice {
                    id: choice_id,
                    question_id,
                    content: choice.content.clone(),
                    is_correct: choice.is_correct,
                });
            }
        }

        Ok(course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{ChoiceSeed, QuestionSeed};

    fn course(name: &str, total_enrollment: i64) -> CourseSeed {
        CourseSeed {
            name: name.to_string(),
            description: String::new(),
            total_enrollment,
            questions: vec![QuestionSeed {
                content: "Q".to_string(),
                grade: 1,
                choices: vec![ChoiceSeed {
                    content: "A".to_string(),
                    is_correct: true,
                }],
            }],
        }
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();

        assert!(store.create_user(new_user("alice")).await.unwrap().is_some());
        assert!(store.create_user(new_user("alice")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn top_courses_breaks_ties_by_id() {
        let store = MemoryStore::new();
        for (name, total) in [("a", 1), ("b", 3), ("c", 1)] {
            store.import_course(&course(name, total)).await.unwrap();
        }

        let names: Vec<String> = store
            .top_courses(10)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn enroll_unknown_course_is_not_found() {
        let store = MemoryStore::new();
        let result = store.enroll(1, 42, EnrollmentMode::Honor).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn submission_rejects_unknown_choice() {
        let store = MemoryStore::new();
        let course_id = store.import_course(&course("a", 0)).await.unwrap();
        let enrollment = store
            .enroll(1, course_id, EnrollmentMode::Honor)
            .await
            .unwrap()
            .unwrap();

        let result = store.create_submission(enrollment.id, &[1, 77]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(store.find_submission(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn submission_choices_are_scoped_to_submission() {
        let store = MemoryStore::new();
        let course_id = store.import_course(&course("a", 0)).await.unwrap();
        let enrollment = store
            .enroll(1, course_id, EnrollmentMode::Honor)
            .await
            .unwrap()
            .unwrap();

        let first = store.create_submission(enrollment.id, &[1]).await.unwrap();
        let second = store.create_submission(enrollment.id, &[]).await.unwrap();

        assert_eq!(store.submission_choice_ids(first.id).await.unwrap(), vec![1]);
        assert!(store.submission_choice_ids(second.id).await.unwrap().is_empty());
    }
}
