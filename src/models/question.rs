// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub course_id: i64,

    /// The text content of the question.
    pub content: String,

    /// Points awarded when the selected choices match the correct ones exactly.
    pub grade: i64,
}

/// Represents the 'choices' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub content: String,
    pub is_correct: bool,
}
