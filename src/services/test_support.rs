// src/services/test_support.rs

use crate::{
    models::user::NewUser,
    seed::{ChoiceSeed, CourseSeed, QuestionSeed},
    store::{MemoryStore, Store},
    utils::session::Viewer,
};

pub(crate) fn choice(content: &str, is_correct: bool) -> ChoiceSeed {
    ChoiceSeed {
        content: content.to_string(),
        is_correct,
    }
}

/// One 5-point question with choices A (correct), B, C (correct),
/// followed by one 2-point question with X (correct), Y.
/// Choice ids in a fresh store: A=1, B=2, C=3, X=4, Y=5.
pub(crate) fn exam_course(name: &str) -> CourseSeed {
    CourseSeed {
        name: name.to_string(),
        description: format!("{name} description"),
        total_enrollment: 0,
        questions: vec![
            QuestionSeed {
                content: "Pick the vowels".to_string(),
                grade: 5,
                choices: vec![choice("A", true), choice("B", false), choice("C", true)],
            },
            QuestionSeed {
                content: "Pick X".to_string(),
                grade: 2,
                choices: vec![choice("X", true), choice("Y", false)],
            },
        ],
    }
}

pub(crate) async fn store_with_course() -> (MemoryStore, i64) {
    let store = MemoryStore::new();
    let course_id = store.import_course(&exam_course("Rust")).await.unwrap();
    (store, course_id)
}

pub(crate) async fn viewer_for(store: &MemoryStore, username: &str) -> Viewer {
    let user = store
        .create_user(NewUser {
            username: username.to_string(),
            password_hash: "unused".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        })
        .await
        .unwrap()
        .unwrap();
    Viewer::user(user.id, &user.username)
}
