// src/seed.rs

//! Course catalog import.
//!
//! Courses, questions and choices are not editable through the HTTP surface,
//! so a catalog file can be imported at startup into an empty store.

use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::AppError, store::Store};

#[derive(Debug, Deserialize, Validate)]
pub struct CatalogSeed {
    #[validate(nested)]
    pub courses: Vec<CourseSeed>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CourseSeed {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub total_enrollment: i64,
    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<QuestionSeed>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionSeed {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    #[serde(default = "default_grade")]
    #[validate(range(min = 0))]
    pub grade: i64,
    #[validate(length(min = 1), nested)]
    pub choices: Vec<ChoiceSeed>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ChoiceSeed {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
    #[serde(default)]
    pub is_correct: bool,
}

fn default_grade() -> i64 {
    1
}

impl CatalogSeed {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let catalog: CatalogSeed = serde_json::from_str(raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }
}

pub async fn load_catalog(path: &Path) -> Result<CatalogSeed, AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::InternalServerError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    CatalogSeed::from_json(&raw)
}

/// Imports the catalog unless the store already holds courses.
/// Returns the number of courses imported.
pub async fn seed_catalog(store: &dyn Store, catalog: &CatalogSeed) -> Result<usize, AppError> {
    let existing = store.count_courses().await?;
    if existing > 0 {
        tracing::info!("Store already holds {} courses, skipping catalog import", existing);
        return Ok(0);
    }

    for course in &catalog.courses {
        let id = store.import_course(course).await?;
        tracing::info!(course_id = id, "Imported course '{}'", course.name);
    }

    Ok(catalog.courses.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const CATALOG: &str = r#"{
        "courses": [
            {
                "name": "Rust Basics",
                "description": "Ownership and borrowing",
                "questions": [
                    {
                        "content": "Which are Copy?",
                        "grade": 5,
                        "choices": [
                            {"content": "i32", "is_correct": true},
                            {"content": "String"},
                            {"content": "bool", "is_correct": true}
                        ]
                    }
                ]
            },
            {"name": "Empty Course"}
        ]
    }"#;

    #[test]
    fn parses_catalog_with_defaults() {
        let catalog = CatalogSeed::from_json(CATALOG).unwrap();

        assert_eq!(catalog.courses.len(), 2);
        assert_eq!(catalog.courses[0].questions[0].grade, 5);
        assert!(!catalog.courses[0].questions[0].choices[1].is_correct);
        assert!(catalog.courses[1].questions.is_empty());
        assert_eq!(catalog.courses[1].total_enrollment, 0);
    }

    #[test]
    fn rejects_question_without_choices() {
        let raw = r#"{"courses":[{"name":"C","questions":[{"content":"Q","choices":[]}]}]}"#;
        assert!(matches!(
            CatalogSeed::from_json(raw),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_negative_grade() {
        let raw = r#"{"courses":[{"name":"C","questions":[{"content":"Q","grade":-1,"choices":[{"content":"A"}]}]}]}"#;
        assert!(CatalogSeed::from_json(raw).is_err());
    }

    #[tokio::test]
    async fn seeds_only_an_empty_store() {
        let store = MemoryStore::new();
        let catalog = CatalogSeed::from_json(CATALOG).unwrap();

        assert_eq!(seed_catalog(&store, &catalog).await.unwrap(), 2);
        assert_eq!(seed_catalog(&store, &catalog).await.unwrap(), 0);
        assert_eq!(store.count_courses().await.unwrap(), 2);
    }
}
