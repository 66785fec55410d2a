// src/models/enrollment.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'enrollments' table in the database.
/// At most one row exists per (user_id, course_id).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,

    /// One of the `EnrollmentMode` strings.
    pub mode: String,

    pub date_enrolled: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentMode {
    Audit,
    Honor,
    Beta,
}

impl EnrollmentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentMode::Audit => "audit",
            EnrollmentMode::Honor => "honor",
            EnrollmentMode::Beta => "BETA",
        }
    }
}

impl std::fmt::Display for EnrollmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
