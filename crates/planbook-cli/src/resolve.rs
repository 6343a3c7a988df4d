//! Id resolution for command arguments.
//!
//! Lessons and class schedule rows are addressed by UUID. The CLI also
//! accepts any unique prefix of the hyphenated form, so the short ids shown
//! by `planbook list` can be typed back in.

use anyhow::{Result, bail};
use uuid::Uuid;

use planbook_store::models::{ClassSchedule, LessonPlan};

/// Match `input` against `ids`, either as a full UUID or a unique prefix.
///
/// Returns `Ok(None)` when nothing matches and an error when the prefix is
/// ambiguous or empty.
fn resolve_prefix(input: &str, ids: &[Uuid], what: &str) -> Result<Option<Uuid>> {
    let needle = input.trim().to_ascii_lowercase();
    if needle.is_empty() {
        bail!("empty {what} ID");
    }

    if let Ok(id) = Uuid::parse_str(&needle) {
        return Ok(ids.iter().copied().find(|candidate| *candidate == id));
    }

    let matches: Vec<Uuid> = ids
        .iter()
        .copied()
        .filter(|id| id.hyphenated().to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [] => Ok(None),
        [id] => Ok(Some(*id)),
        _ => bail!(
            "{what} ID prefix {input:?} is ambiguous ({} matches); use more characters",
            matches.len()
        ),
    }
}

/// Resolve a lesson id or id prefix against the current collection.
pub fn resolve_lesson_id(input: &str, lessons: &[LessonPlan]) -> Result<Option<Uuid>> {
    let ids: Vec<Uuid> = lessons.iter().map(|l| l.id).collect();
    resolve_prefix(input, &ids, "lesson")
}

/// Resolve a class schedule row id or prefix within one lesson.
pub fn resolve_schedule_id(input: &str, rows: &[ClassSchedule]) -> Result<Uuid> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    match resolve_prefix(input, &ids, "class schedule")? {
        Some(id) => Ok(id),
        None => bail!("no class schedule row matches {input:?}"),
    }
}

/// The short form printed in listings.
pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}
