// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

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

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, first_name, last_name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, first_name, last_name, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, password, first_name, last_name, created_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        })?;

        Ok(user)
    }

    async fn top_courses(&self, limit: i64) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, description, total_enrollment, created_at
            FROM courses
            ORDER BY total_enrollment DESC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    async fn find_course(&self, course_id: i64) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            "SELECT id, name, description, total_enrollment, created_at FROM courses WHERE id = $1",
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn count_courses(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find_enrollment(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, AppError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, user_id, course_id, mode, date_enrolled
            FROM enrollments
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    async fn find_enrollment_by_id(
        &self,
        enrollment_id: i64,
    ) -> Result<Option<Enrollment>, AppError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT id, user_id, course_id, mode, date_enrolled FROM enrollments WHERE id = $1",
        )
        .bind(enrollment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    async fn enrolled_course_ids(
        &self,
        user_id: i64,
        course_ids: &[i64],
    ) -> Result<Vec<i64>, AppError> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT course_id FROM enrollments WHERE user_id = $1 AND course_id = ANY($2)",
        )
        .bind(user_id)
        .bind(course_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn enroll(
        &self,
        user_id: i64,
        course_id: i64,
        mode: EnrollmentMode,
    ) -> Result<Option<Enrollment>, AppError> {
        let mut tx = self.pool.begin().await?;

        // The unique (user_id, course_id) index turns a concurrent second
        // enroll into a no-op, so the counter moves at most once per user.
        let inserted = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (user_id, course_id, mode)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, course_id) DO NOTHING
            RETURNING id, user_id, course_id, mode, date_enrolled
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(mode.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert enrollment: {:?}", e);
            AppError::from(e)
        })?;

        if inserted.is_some() {
            let result = sqlx::query(
                "UPDATE courses SET total_enrollment = total_enrollment + 1 WHERE id = $1",
            )
            .bind(course_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found("Course"));
            }
        }

        tx.commit().await?;

        Ok(inserted)
    }

    async fn questions_for_course(&self, course_id: i64) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT id, course_id, content, grade FROM questions WHERE course_id = $1 ORDER BY id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn choices_for_course(&self, course_id: i64) -> Result<Vec<Choice>, AppError> {
        let choices = sqlx::query_as::<_, Choice>(
            r#"
            SELECT c.id, c.question_id, c.content, c.is_correct
            FROM choices c
            JOIN questions q ON q.id = c.question_id
            WHERE q.course_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }

    async fn create_submission(
        &self,
        enrollment_id: i64,
        choice_ids: &[i64],
    ) -> Result<Submission, AppError> {
        let mut tx = self.pool.begin().await?;

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (enrollment_id)
            VALUES ($1)
            RETURNING id, enrollment_id, created_at
            "#,
        )
        .bind(enrollment_id)
        .fetch_one(&mut *tx)
        .await?;

        if !choice_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO submission_choices (submission_id, choice_id)
                SELECT $1, UNNEST($2::BIGINT[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(submission.id)
            .bind(choice_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                // 23503: foreign_key_violation
                if e.as_database_error().and_then(|d| d.code()).as_deref() == Some("23503") {
                    AppError::BadRequest("Unknown choice".to_string())
                } else {
                    tracing::error!("Failed to store submission choices: {:?}", e);
                    AppError::from(e)
                }
            })?;
        }

        tx.commit().await?;

        Ok(submission)
    }

    async fn find_submission(&self, submission_id: i64) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            "SELECT id, enrollment_id, created_at FROM submissions WHERE id = $1",
        )
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn submission_choice_ids(&self, submission_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT choice_id FROM submission_choices WHERE submission_id = $1 ORDER BY choice_id",
        )
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn import_course(&self, seed: &CourseSeed) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let course_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO courses (name, description, total_enrollment)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&seed.name)
        .bind(&seed.description)
        .bind(seed.total_enrollment)
        .fetch_one(&mut *tx)
        .await?;

        for question in &seed.questions {
            let question_id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO questions (course_id, content, grade) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(course_id)
            .bind(&question.content)
            .bind(question.grade)
            .fetch_one(&mut *tx)
            .await?;

            for choice in &question.choices {
                sqlx::query(
                    "INSERT INTO choices (question_id, content, is_correct) VALUES ($1, $2, $3)",
                )
                .bind(question_id)
                .bind(&choice.content)
                .bind(choice.is_correct)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(course_id)
    }
}
