// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'courses' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,

    pub name: String,

    pub description: String,

    /// Number of enrollments ever made. Drives the listing order.
    pub total_enrollment: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}
