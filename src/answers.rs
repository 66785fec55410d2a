// src/answers.rs

/// Form fields whose key starts with this marker carry a selected choice id.
pub const CHOICE_FIELD_PREFIX: &str = "choice";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("field '{field}' has a non-numeric choice id '{value}'")]
    MalformedChoice { field: String, value: String },
}

/// Collects the selected choice ids from submitted form fields.
///
/// Fields are scanned in submission order. Keys without the `choice` prefix
/// are ignored; the same key may repeat (checkbox groups).
pub fn extract_answers(fields: &[(String, String)]) -> Result<Vec<i64>, AnswerError> {
    fields
        .iter()
        .filter(|(key, _)| key.starts_with(CHOICE_FIELD_PREFIX))
        .map(|(key, value)| {
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| AnswerError::MalformedChoice {
                    field: key.clone(),
                    value: value.clone(),
                })
        })
        .collect()
}
