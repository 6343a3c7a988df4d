//! CLI handlers for lesson plan commands.
//!
//! Implements:
//! - `planbook list`              -- list lessons, newest first
//! - `planbook show <id>`         -- print one lesson
//! - `planbook new [edits]`       -- open a blank buffer, apply edits, save
//! - `planbook edit <id> [edits]` -- open a stored lesson, apply edits, save
//! - `planbook delete <id>`       -- remove a lesson

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use planbook_core::editor::{FieldPath, LessonDraft, ScheduleField};
use planbook_core::{GenerationOutcome, LessonGenerator, Session};
use planbook_store::models::LessonPlan;

use crate::EditArgs;
use crate::config::GenerationSettings;
use crate::resolve::{resolve_lesson_id, resolve_schedule_id, short_id};

fn require_signed_in(session: &Session) -> Result<()> {
    if session.user().is_none() {
        bail!("not signed in; run `planbook login --email <email> --name <name>` first");
    }
    Ok(())
}

fn find_lesson(session: &Session, input: &str) -> Result<Uuid> {
    match resolve_lesson_id(input, session.lessons())? {
        Some(id) => Ok(id),
        None => bail!("no lesson matches {input:?}"),
    }
}

// -----------------------------------------------------------------------
// planbook list
// -----------------------------------------------------------------------

pub fn cmd_list(session: &Session) -> Result<()> {
    require_signed_in(session)?;
    let lessons = session.lessons();

    if lessons.is_empty() {
        println!("No lesson plans yet. Use `planbook new` to create one.");
        return Ok(());
    }

    let id_w = 8;
    let title_w = lessons
        .iter()
        .map(|l| l.title.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);
    let subject_w = lessons
        .iter()
        .map(|l| l.subject.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);
    let status_w = 9;

    println!(
        "{:<id_w$}  {:<title_w$}  {:<subject_w$}  {:<status_w$}  DATE",
        "ID", "TITLE", "SUBJECT", "STATUS",
    );
    for lesson in lessons {
        println!(
            "{:<id_w$}  {:<title_w$}  {:<subject_w$}  {:<status_w$}  {}",
            short_id(lesson.id),
            lesson.title,
            lesson.subject,
            lesson.status,
            lesson.date,
        );
    }

    Ok(())
}

// -----------------------------------------------------------------------
// planbook show <id>
// -----------------------------------------------------------------------

pub fn cmd_show(session: &Session, input: &str, json: bool) -> Result<()> {
    require_signed_in(session)?;
    let id = find_lesson(session, input)?;
    let Some(lesson) = session.lessons().iter().find(|l| l.id == id) else {
        bail!("no lesson matches {input:?}");
    };

    if json {
        let text = serde_json::to_string_pretty(lesson).context("failed to serialize lesson")?;
        println!("{text}");
    } else {
        print_lesson(lesson);
    }
    Ok(())
}

fn print_section(heading: &str, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    println!();
    println!("{heading}:");
    for line in text.lines() {
        println!("  {line}");
    }
}

fn print_lesson(lesson: &LessonPlan) {
    println!("{}", lesson.title);
    println!("  ID:          {}", lesson.id);
    println!("  Status:      {}", lesson.status);
    println!("  Subject:     {}", lesson.subject);
    println!("  Grade level: {}", lesson.grade_level);
    if !lesson.duration.is_empty() {
        println!("  Duration:    {}", lesson.duration);
    }
    println!("  Date:        {}", lesson.date);
    println!(
        "  Created:     {}",
        lesson.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    print_section("Objectives", &lesson.objectives);
    print_section("Standards", &lesson.standards);

    if !lesson.materials.is_empty() {
        println!();
        println!("Materials:");
        for (i, material) in lesson.materials.iter().enumerate() {
            println!("  {}. {material}", i + 1);
        }
    }

    if !lesson.class_schedules.is_empty() {
        println!();
        println!("Class schedules:");
        for row in &lesson.class_schedules {
            println!("  [{}] {}", short_id(row.id), row.class_name);
            if !row.period.is_empty() {
                println!("    Period: {}", row.period);
            }
            if !row.room.is_empty() {
                println!("    Room:   {}", row.room);
            }
            if !row.specific_notes.is_empty() {
                println!("    Notes:  {}", row.specific_notes);
            }
        }
    }

    let p = &lesson.procedure;
    print_section("Anticipatory set", &p.anticipatory_set);
    print_section("Direct instruction", &p.direct_instruction);
    print_section("Guided practice", &p.guided_practice);
    print_section("Independent practice", &p.independent_practice);
    print_section("Closure", &p.closure);
    print_section("Assessment", &lesson.assessment);
    print_section("Differentiation", &lesson.differentiation);
}

// -----------------------------------------------------------------------
// Edit flags
// -----------------------------------------------------------------------

/// Split `PATH=VALUE` on the first `=`.
fn split_assignment<'a>(raw: &'a str, flag: &str) -> Result<(&'a str, &'a str)> {
    raw.split_once('=')
        .with_context(|| format!("{flag} expects KEY=VALUE, got {raw:?}"))
}

/// Apply every edit flag to the draft.
///
/// All flags are checked before the first change, so an invalid flag
/// leaves the draft untouched.
pub fn apply_edits(draft: &mut LessonDraft, edits: &EditArgs) -> Result<()> {
    let mut fields = Vec::with_capacity(edits.set.len());
    for raw in &edits.set {
        let (path, value) = split_assignment(raw, "--set")?;
        let path: FieldPath = path.parse()?;
        fields.push((path, value));
    }

    let count = draft.materials.len();
    let mut removals: Vec<usize> = edits
        .remove_materials
        .iter()
        .copied()
        .filter(|index| {
            let in_range = (1..=count).contains(index);
            if !in_range {
                eprintln!(
                    "warning: --remove-material {index} is out of range (lesson has {count} materials); skipped"
                );
            }
            in_range
        })
        .collect();
    removals.sort_unstable();
    removals.dedup();

    let mut class_updates = Vec::with_capacity(edits.set_classes.len());
    for raw in &edits.set_classes {
        let (id, assignment) = raw
            .split_once(':')
            .with_context(|| format!("--set-class expects ID:FIELD=VALUE, got {raw:?}"))?;
        let (field, value) = split_assignment(assignment, "--set-class")?;
        let id = resolve_schedule_id(id, &draft.class_schedules)?;
        let field: ScheduleField = field.parse()?;
        class_updates.push((id, field, value));
    }

    let mut class_removals = Vec::with_capacity(edits.remove_classes.len());
    for raw in &edits.remove_classes {
        class_removals.push(resolve_schedule_id(raw, &draft.class_schedules)?);
    }

    for (path, value) in fields {
        draft.set_field(path, value);
    }
    if let Some(status) = edits.status {
        draft.set_status(status);
    }
    // Highest index first so earlier positions stay valid.
    for index in removals.into_iter().rev() {
        draft.remove_material(index - 1);
    }
    for material in &edits.materials {
        draft.add_material(material);
    }
    for (id, field, value) in class_updates {
        draft.update_class_schedule(id, field, value);
    }
    for id in class_removals {
        draft.remove_class_schedule(id);
    }
    for name in &edits.add_classes {
        let id = draft.add_class_schedule();
        draft.update_class_schedule(id, ScheduleField::ClassName, name.as_str());
    }

    Ok(())
}

async fn generate_into_buffer(session: &mut Session, settings: &GenerationSettings) -> Result<()> {
    let generator = settings.generator();
    eprintln!("Generating lesson content with {}...", generator.name());
    match session.generate(&generator, Some(settings.timeout)).await? {
        GenerationOutcome::Applied => Ok(()),
        GenerationOutcome::Discarded => bail!("generated content arrived after the lesson was closed"),
    }
}

async fn finish_edit(
    session: &mut Session,
    edits: &EditArgs,
    settings: &GenerationSettings,
) -> Result<LessonPlan> {
    let Some(draft) = session.editor_mut() else {
        bail!("no lesson is open for editing");
    };
    apply_edits(draft, edits)?;

    if edits.generate {
        generate_into_buffer(session, settings)
            .await
            .context("nothing was saved")?;
    }

    Ok(session.save().await?)
}

// -----------------------------------------------------------------------
// planbook new / edit
// -----------------------------------------------------------------------

pub async fn cmd_new(
    session: &mut Session,
    edits: &EditArgs,
    settings: &GenerationSettings,
) -> Result<()> {
    require_signed_in(session)?;
    session.start_create()?;
    let lesson = finish_edit(session, edits, settings).await?;

    println!("Lesson created.");
    println!();
    println!("  ID:     {}", lesson.id);
    println!("  Title:  {}", lesson.title);
    println!("  Status: {}", lesson.status);
    Ok(())
}

pub async fn cmd_edit(
    session: &mut Session,
    input: &str,
    edits: &EditArgs,
    settings: &GenerationSettings,
) -> Result<()> {
    require_signed_in(session)?;
    let id = find_lesson(session, input)?;
    session.start_edit(id)?;
    let lesson = finish_edit(session, edits, settings).await?;

    println!("Lesson {} saved.", short_id(lesson.id));
    Ok(())
}

// -----------------------------------------------------------------------
// planbook delete <id>
// -----------------------------------------------------------------------

pub async fn cmd_delete(session: &mut Session, input: &str) -> Result<()> {
    require_signed_in(session)?;
    let Some(id) = resolve_lesson_id(input, session.lessons())? else {
        println!("No lesson matches {input:?}; nothing deleted.");
        return Ok(());
    };

    if session.delete(id).await? {
        println!("Lesson {} deleted.", short_id(id));
    } else {
        println!("No lesson matches {input:?}; nothing deleted.");
    }
    Ok(())
}
