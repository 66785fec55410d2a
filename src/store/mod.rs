// src/store/mod.rs

//! Data access.
//!
//! Every query the application needs is a method on [`Store`]; methods return
//! plain records and relationships are resolved by explicit lookups.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

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

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type SharedStore = Arc<dyn Store>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Inserts a user. Returns `None` when the username is already taken.
    async fn create_user(&self, new_user: NewUser) -> Result<Option<User>, AppError>;

    /// Courses ordered by `total_enrollment` descending, ties by id.
    async fn top_courses(&self, limit: i64) -> Result<Vec<Course>, AppError>;

    async fn find_course(&self, course_id: i64) -> Result<Option<Course>, AppError>;

    async fn count_courses(&self) -> Result<i64, AppError>;

    async fn find_enrollment(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, AppError>;

    async fn find_enrollment_by_id(&self, enrollment_id: i64)
    -> Result<Option<Enrollment>, AppError>;

    /// The subset of `course_ids` the user is enrolled in.
    async fn enrolled_course_ids(
        &self,
        user_id: i64,
        course_ids: &[i64],
    ) -> Result<Vec<i64>, AppError>;

    /// Creates the enrollment and bumps the course counter as one unit.
    /// Returns `None` without side effects if the pair is already enrolled.
    async fn enroll(
        &self,
        user_id: i64,
        course_id: i64,
        mode: EnrollmentMode,
    ) -> Result<Option<Enrollment>, AppError>;

    async fn questions_for_course(&self, course_id: i64) -> Result<Vec<Question>, AppError>;

    /// All choices of all questions of the course.
    async fn choices_for_course(&self, course_id: i64) -> Result<Vec<Choice>, AppError>;

    /// Creates the submission together with its selected choices.
    async fn create_submission(
        &self,
        enrollment_id: i64,
        choice_ids: &[i64],
    ) -> Result<Submission, AppError>;

    async fn find_submission(&self, submission_id: i64) -> Result<Option<Submission>, AppError>;

    async fn submission_choice_ids(&self, submission_id: i64) -> Result<Vec<i64>, AppError>;

    /// Inserts a course with its questions and choices. Returns the course id.
    async fn import_course(&self, course: &CourseSeed) -> Result<i64, AppError>;
}
