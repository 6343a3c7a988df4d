//! Integration tests for the lesson collection slot.
//!
//! Each test opens an isolated store in a temporary directory.

use uuid::Uuid;

use planbook_store::queries::lessons;
use planbook_store::{SlotStore, StoreConfig};
use planbook_test_utils::{create_test_store, sample_lesson};

fn ids(list: &[planbook_store::models::LessonPlan]) -> Vec<Uuid> {
    list.iter().map(|l| l.id).collect()
}

#[tokio::test]
async fn list_is_empty_on_first_use() {
    let (store, _dir) = create_test_store().await;
    let list = lessons::list_lessons(&store).await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn upsert_returns_collection_newest_first() {
    let (store, _dir) = create_test_store().await;
    let a = sample_lesson("Photosynthesis");
    let b = sample_lesson("Cell division");

    let after_a = lessons::upsert_lesson(&store, a.clone()).await.unwrap();
    assert_eq!(ids(&after_a), vec![a.id]);

    let after_b = lessons::upsert_lesson(&store, b.clone()).await.unwrap();
    assert_eq!(ids(&after_b), vec![b.id, a.id]);

    let listed = lessons::list_lessons(&store).await.unwrap();
    assert_eq!(listed, after_b);
}

#[tokio::test]
async fn upsert_sequence_keeps_one_entry_per_id_with_latest_content() {
    let (store, _dir) = create_test_store().await;
    let a = sample_lesson("a");
    let b = sample_lesson("b");
    let c = sample_lesson("c");

    lessons::upsert_lesson(&store, a.clone()).await.unwrap();
    lessons::upsert_lesson(&store, b.clone()).await.unwrap();
    lessons::upsert_lesson(&store, c.clone()).await.unwrap();

    let mut b2 = b.clone();
    b2.title = "b, second draft".to_owned();
    lessons::upsert_lesson(&store, b2.clone()).await.unwrap();

    let mut a2 = a.clone();
    a2.materials.push("Ruler".to_owned());
    lessons::upsert_lesson(&store, a2.clone()).await.unwrap();

    let listed = lessons::list_lessons(&store).await.unwrap();
    assert_eq!(ids(&listed), vec![a.id, b.id, c.id]);
    assert_eq!(listed[0], a2);
    assert_eq!(listed[1], b2);
    assert_eq!(listed[2], c);
}

#[tokio::test]
async fn repeated_identical_upsert_is_stable() {
    let (store, _dir) = create_test_store().await;
    let a = sample_lesson("a");
    let first = lessons::upsert_lesson(&store, a.clone()).await.unwrap();
    let second = lessons::upsert_lesson(&store, a.clone()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.len(), 1);
}

#[tokio::test]
async fn delete_removes_lesson() {
    let (store, _dir) = create_test_store().await;
    let a = sample_lesson("a");
    let b = sample_lesson("b");
    lessons::upsert_lesson(&store, a.clone()).await.unwrap();
    lessons::upsert_lesson(&store, b.clone()).await.unwrap();

    let after = lessons::delete_lesson(&store, a.id).await.unwrap();
    assert_eq!(ids(&after), vec![b.id]);

    let listed = lessons::list_lessons(&store).await.unwrap();
    assert!(listed.iter().all(|l| l.id != a.id));
    assert!(lessons::get_lesson(&store, a.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_absent_id_changes_nothing() {
    let (store, _dir) = create_test_store().await;
    let a = sample_lesson("a");
    lessons::upsert_lesson(&store, a.clone()).await.unwrap();
    let before = std::fs::read(store.config().slot_path(StoreConfig::LESSONS_SLOT)).unwrap();

    let after = lessons::delete_lesson(&store, Uuid::new_v4()).await.unwrap();
    assert_eq!(after, vec![a]);

    let bytes = std::fs::read(store.config().slot_path(StoreConfig::LESSONS_SLOT)).unwrap();
    assert_eq!(bytes, before);
}

#[tokio::test]
async fn delete_on_empty_store_is_not_an_error() {
    let (store, _dir) = create_test_store().await;
    let after = lessons::delete_lesson(&store, Uuid::new_v4()).await.unwrap();
    assert!(after.is_empty());
}

#[tokio::test]
async fn collection_survives_reopen() {
    let (store, dir) = create_test_store().await;
    let a = sample_lesson("a");
    let b = sample_lesson("b");
    lessons::upsert_lesson(&store, a.clone()).await.unwrap();
    lessons::upsert_lesson(&store, b.clone()).await.unwrap();
    drop(store);

    let reopened = SlotStore::open(StoreConfig::new(dir.path().join("data")))
        .await
        .unwrap();
    let listed = lessons::list_lessons(&reopened).await.unwrap();
    assert_eq!(listed, vec![b, a]);
}

#[tokio::test]
async fn persisted_layout_is_a_single_json_array() {
    let (store, _dir) = create_test_store().await;
    let a = sample_lesson("a");
    lessons::upsert_lesson(&store, a.clone()).await.unwrap();

    let raw = std::fs::read_to_string(store.config().slot_path(StoreConfig::LESSONS_SLOT)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let array = value.as_array().expect("collection should be a JSON array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["id"], a.id.to_string());
    assert_eq!(array[0]["gradeLevel"], "5th Grade");
    assert_eq!(array[0]["procedure"]["closure"], "Share-out");
    assert_eq!(array[0]["classSchedules"][0]["room"], "104");
}

#[tokio::test]
async fn reads_documents_written_without_optional_keys() {
    let (store, _dir) = create_test_store().await;
    let id = Uuid::new_v4();
    let raw = serde_json::json!([{
        "id": id.to_string(),
        "title": "Legacy",
        "subject": "History",
        "gradeLevel": "8",
        "duration": "",
        "objectives": "",
        "standards": "",
        "procedure": {
            "anticipatorySet": "",
            "directInstruction": "",
            "guidedPractice": "",
            "independentPractice": "",
            "closure": ""
        },
        "assessment": "",
        "differentiation": "",
        "createdAt": 1_700_000_000_000_i64
    }]);
    std::fs::write(
        store.config().slot_path(StoreConfig::LESSONS_SLOT),
        serde_json::to_vec(&raw).unwrap(),
    )
    .unwrap();

    let listed = lessons::list_lessons(&store).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert!(listed[0].materials.is_empty());
    assert!(listed[0].class_schedules.is_empty());
    assert_eq!(listed[0].created_at.timestamp_millis(), 1_700_000_000_000);
}
