// src/grading.rs

//! All-or-nothing scoring of an exam submission.
//!
//! A question awards its full grade only when the set of selected choices
//! belonging to it equals its set of correct choices. The score is always
//! recomputed from the stored selection.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::question::{Choice, Question};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOutcome {
    pub choice_id: i64,
    pub is_correct: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOutcome {
    pub question_id: i64,
    pub grade: i64,
    pub awarded: i64,
    /// Selected choices equal the correct choices.
    pub matched: bool,
    pub choices: Vec<ChoiceOutcome>,
}

impl QuestionOutcome {
    pub fn is_correct(&self) -> bool {
        self.matched
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamScore {
    pub total_score: i64,
    pub possible_score: i64,
    pub questions: Vec<QuestionOutcome>,
}

/// Grades `selected` against the questions of one course.
///
/// `choices` may contain choices of any question; those not belonging to one
/// of `questions` are ignored, as are selected ids that match no choice.
pub fn grade_submission(
    questions: &[Question],
    choices: &[Choice],
    selected: &BTreeSet<i64>,
) -> ExamScore {
    let mut by_question: HashMap<i64, Vec<&Choice>> = HashMap::new();
    for choice in choices {
        by_question.entry(choice.question_id).or_default().push(choice);
    }

    let mut total_score = 0;
    let mut possible_score = 0;
    let mut outcomes = Vec::with_capacity(questions.len());

    for question in questions {
        possible_score += question.grade;

        let own = by_question
            .get(&question.id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let correct: BTreeSet<i64> = own.iter().filter(|c| c.is_correct).map(|c| c.id).collect();
        let picked: BTreeSet<i64> = own
            .iter()
            .filter(|c| selected.contains(&c.id))
            .map(|c| c.id)
            .collect();

        let matched = correct == picked;
        let awarded = if matched { question.grade } else { 0 };
        total_score += awarded;

        outcomes.push(QuestionOutcome {
            question_id: question.id,
            grade: question.grade,
            awarded,
            matched,
            choices: own
                .iter()
                .map(|c| ChoiceOutcome {
                    choice_id: c.id,
                    is_correct: c.is_correct,
                    selected: picked.contains(&c.id),
                })
                .collect(),
        });
    }

    ExamScore {
        total_score,
        possible_score,
        questions: outcomes,
    }
}
