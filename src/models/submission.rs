// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'submissions' table in the database.
/// Selected choices live in 'submission_choices'; the score is never stored.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub enrollment_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
