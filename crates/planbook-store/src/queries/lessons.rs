//! Operations on the lesson collection slot.
//!
//! The collection is stored as one ordered array, most recently saved
//! first. Every mutation reads the current collection, computes the next
//! one in memory, and writes it back as a single slot write.

use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::models::LessonPlan;
use crate::slot::SlotStore;

/// List all lessons, most recently saved first. Empty on first use.
pub async fn list_lessons(store: &SlotStore) -> Result<Vec<LessonPlan>> {
    let lessons = store
        .read::<Vec<LessonPlan>>(StoreConfig::LESSONS_SLOT)
        .await?
        .unwrap_or_default();
    Ok(lessons)
}

/// Fetch one lesson by its ID.
pub async fn get_lesson(store: &SlotStore, id: Uuid) -> Result<Option<LessonPlan>> {
    let lessons = list_lessons(store).await?;
    Ok(lessons.into_iter().find(|l| l.id == id))
}

/// Insert or replace a lesson by ID and move it to the front.
///
/// Returns the resulting collection.
pub async fn upsert_lesson(store: &SlotStore, lesson: LessonPlan) -> Result<Vec<LessonPlan>> {
    let current = list_lessons(store).await?;
    let id = lesson.id;
    let replaced = current.iter().any(|l| l.id == id);

    let next = with_upserted(current, lesson);
    store.write(StoreConfig::LESSONS_SLOT, &next).await?;

    info!(lesson_id = %id, replaced, total = next.len(), "lesson saved");
    Ok(next)
}

/// Remove a lesson by ID. Removing an absent ID leaves the collection as it
/// was and is not an error.
///
/// Returns the resulting collection.
pub async fn delete_lesson(store: &SlotStore, id: Uuid) -> Result<Vec<LessonPlan>> {
    let current = list_lessons(store).await?;
    let before = current.len();

    let next = without(current, id);
    if next.len() == before {
        return Ok(next);
    }

    store.write(StoreConfig::LESSONS_SLOT, &next).await?;
    info!(lesson_id = %id, total = next.len(), "lesson deleted");
    Ok(next)
}

fn with_upserted(current: Vec<LessonPlan>, lesson: LessonPlan) -> Vec<LessonPlan> {
    let mut next = Vec::with_capacity(current.len() + 1);
    let id = lesson.id;
    next.push(lesson);
    next.extend(current.into_iter().filter(|l| l.id != id));
    next
}

fn without(current: Vec<LessonPlan>, id: Uuid) -> Vec<LessonPlan> {
    current.into_iter().filter(|l| l.id != id).collect()
}
