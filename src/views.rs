// src/views.rs

//! Page documents returned by the handlers.
//!
//! Each page is built from service results only; nothing here touches the
//! store or makes decisions.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    models::{
        course::Course,
        question::{Choice, Question},
    },
    services::{
        courses::{CourseDetail, ListedCourse},
        exam::ExamResult,
    },
    utils::session::Viewer,
};

#[derive(Debug, Serialize)]
pub struct ViewerInfo {
    pub id: i64,
    pub username: String,
}

fn viewer_info(viewer: &Viewer) -> Option<ViewerInfo> {
    viewer.0.as_ref().map(|u| ViewerInfo {
        id: u.id,
        username: u.username.clone(),
    })
}

/// Registration or login form, optionally with a message for the user.
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub page: &'static str,
    pub viewer: Option<ViewerInfo>,
    pub message: Option<String>,
}

impl FormPage {
    pub fn registration(viewer: &Viewer, message: Option<&str>) -> Self {
        Self {
            page: "registration",
            viewer: viewer_info(viewer),
            message: message.map(str::to_string),
        }
    }

    pub fn login(viewer: &Viewer, message: Option<&str>) -> Self {
        Self {
            page: "login",
            viewer: viewer_info(viewer),
            message: message.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseCard {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub total_enrollment: i64,
    pub is_enrolled: bool,
}

impl CourseCard {
    fn new(course: Course, is_enrolled: bool) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            total_enrollment: course.total_enrollment,
            is_enrolled,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseListPage {
    pub viewer: Option<ViewerInfo>,
    pub courses: Vec<CourseCard>,
}

impl CourseListPage {
    pub fn new(viewer: &Viewer, listed: Vec<ListedCourse>) -> Self {
        Self {
            viewer: viewer_info(viewer),
            courses: listed
                .into_iter()
                .map(|l| CourseCard::new(l.course, l.is_enrolled))
                .collect(),
        }
    }
}

/// A choice as shown on the exam form. Correctness is not exposed.
#[derive(Debug, Serialize)]
pub struct ExamChoice {
    pub id: i64,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ExamQuestion {
    pub id: i64,
    pub content: String,
    pub grade: i64,
    pub choices: Vec<ExamChoice>,
}

#[derive(Debug, Serialize)]
pub struct CourseDetailPage {
    pub viewer: Option<ViewerInfo>,
    pub course: CourseCard,
    pub questions: Vec<ExamQuestion>,
}

fn group_choices(choices: Vec<Choice>) -> HashMap<i64, Vec<Choice>> {
    let mut grouped: HashMap<i64, Vec<Choice>> = HashMap::new();
    for choice in choices {
        grouped.entry(choice.question_id).or_default().push(choice);
    }
    grouped
}

impl CourseDetailPage {
    pub fn new(viewer: &Viewer, detail: CourseDetail) -> Self {
        let mut grouped = group_choices(detail.choices);

        Self {
            viewer: viewer_info(viewer),
            course: CourseCard::new(detail.course, detail.is_enrolled),
            questions: detail
                .questions
                .into_iter()
                .map(|q| ExamQuestion {
                    choices: grouped
                        .remove(&q.id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|c| ExamChoice {
                            id: c.id,
                            content: c.content,
                        })
                        .collect(),
                    id: q.id,
                    content: q.content,
                    grade: q.grade,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultChoice {
    pub id: i64,
    pub content: String,
    pub is_correct: bool,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct ResultQuestion {
    pub id: i64,
    pub content: String,
    pub grade: i64,
    pub awarded: i64,
    pub choices: Vec<ResultChoice>,
}

#[derive(Debug, Serialize)]
pub struct ExamResultPage {
    pub viewer: Option<ViewerInfo>,
    pub course_id: i64,
    pub course_name: String,
    pub submission_id: i64,
    pub grade: i64,
    pub total_possible_score: i64,
    pub questions: Vec<ResultQuestion>,
}

impl ExamResultPage {
    pub fn new(viewer: &Viewer, result: ExamResult) -> Self {
        let questions: HashMap<i64, Question> =
            result.questions.into_iter().map(|q| (q.id, q)).collect();
        let mut choices: HashMap<i64, Choice> =
            result.choices.into_iter().map(|c| (c.id, c)).collect();

        let questions = result
            .score
            .questions
            .into_iter()
            .map(|outcome| ResultQuestion {
                id: outcome.question_id,
                content: questions
                    .get(&outcome.question_id)
                    .map(|q| q.content.clone())
                    .unwrap_or_default(),
                grade: outcome.grade,
                awarded: outcome.awarded,
                choices: outcome
                    .choices
                    .into_iter()
                    .map(|c| ResultChoice {
                        id: c.choice_id,
                        content: choices
                            .remove(&c.choice_id)
                            .map(|choice| choice.content)
                            .unwrap_or_default(),
                        is_correct: c.is_correct,
                        selected: c.selected,
                    })
                    .collect(),
            })
            .collect();

        Self {
            viewer: viewer_info(viewer),
            course_id: result.course.id,
            course_name: result.course.name,
            submission_id: result.submission.id,
            grade: result.score.total_score,
            total_possible_score: result.score.possible_score,
            questions,
        }
    }
}
