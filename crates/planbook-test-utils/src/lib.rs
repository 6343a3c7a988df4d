//! Shared test utilities for planbook integration tests.
//!
//! Each test gets its own data directory under a [`TempDir`]; the directory
//! (and every slot in it) is removed when the returned guard is dropped.

use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use planbook_store::models::{ClassSchedule, LessonPlan, LessonStatus, Procedure, User, creation_date};
use planbook_store::{SlotStore, StoreConfig};

/// Open a store in a fresh temporary directory.
///
/// Keep the returned [`TempDir`] alive for as long as the store is used.
pub async fn create_test_store() -> (SlotStore, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = SlotStore::open(StoreConfig::new(dir.path().join("data")))
        .await
        .expect("failed to open test store");
    (store, dir)
}

/// A fully populated lesson with a fresh id.
pub fn sample_lesson(title: &str) -> LessonPlan {
    let created_at = Utc::now();
    LessonPlan {
        id: Uuid::new_v4(),
        title: title.to_owned(),
        subject: "Science".to_owned(),
        grade_level: "5th Grade".to_owned(),
        duration: "50 minutes".to_owned(),
        date: creation_date(created_at),
        objectives: format!("Students will understand {title}."),
        standards: "NGSS 5-PS1-1".to_owned(),
        materials: vec!["Worksheet".to_owned(), "Markers".to_owned()],
        class_schedules: vec![ClassSchedule {
            id: Uuid::new_v4(),
            class_name: "Homeroom 5B".to_owned(),
            period: "2".to_owned(),
            room: "104".to_owned(),
            specific_notes: "Lab goggles on the back shelf".to_owned(),
        }],
        procedure: Procedure {
            anticipatory_set: "Warm-up question".to_owned(),
            direct_instruction: "Mini lecture".to_owned(),
            guided_practice: "Pair work".to_owned(),
            independent_practice: "Exit worksheet".to_owned(),
            closure: "Share-out".to_owned(),
        },
        assessment: "Exit ticket".to_owned(),
        differentiation: "Visual aids".to_owned(),
        status: LessonStatus::Draft,
        created_at,
    }
}

/// A placeholder signed-in user.
pub fn sample_user() -> User {
    User {
        id: Uuid::new_v4(),
        email: "teacher@school.edu".to_owned(),
        name: "Demo Teacher".to_owned(),
        school: Some("Global Academic Heights".to_owned()),
    }
}
