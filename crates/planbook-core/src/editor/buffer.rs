//! The in-progress copy of one lesson.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use planbook_store::models::{
    ClassSchedule, LessonPlan, LessonStatus, Procedure, creation_date,
};

use super::field::{FieldPath, LessonField, ProcedureField, ScheduleField};
use crate::generate::{GenerationRequest, PartialLesson, PartialProcedure};

/// A local precondition failed. Nothing outside the process was contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationRejected(pub String);

/// Editable lesson buffer.
///
/// Owns its data outright: opening a buffer from a stored lesson deep-copies
/// it, so edits are invisible to the store until [`LessonDraft::commit`]
/// hands the result back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDraft {
    /// `None` until the lesson is saved for the first time.
    pub id: Option<Uuid>,
    pub title: String,
    pub subject: String,
    pub grade_level: String,
    pub duration: String,
    pub date: String,
    pub objectives: String,
    pub standards: String,
    pub materials: Vec<String>,
    pub class_schedules: Vec<ClassSchedule>,
    pub procedure: Procedure,
    pub assessment: String,
    pub differentiation: String,
    pub status: LessonStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl LessonDraft {
    /// A blank draft: empty text, empty collections, status `draft`, and
    /// `created_at` fixed to now.
    pub fn blank() -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: String::new(),
            subject: String::new(),
            grade_level: String::new(),
            duration: String::new(),
            date: creation_date(now),
            objectives: String::new(),
            standards: String::new(),
            materials: Vec::new(),
            class_schedules: Vec::new(),
            procedure: Procedure::default(),
            assessment: String::new(),
            differentiation: String::new(),
            status: LessonStatus::Draft,
            created_at: Some(now),
        }
    }

    /// Open a draft from an existing lesson, or a blank one.
    pub fn open(seed: Option<&LessonPlan>) -> Self {
        match seed {
            Some(lesson) => Self::from(lesson.clone()),
            None => Self::blank(),
        }
    }

    // -- Scalars --

    pub fn set_field(&mut self, path: FieldPath, value: impl Into<String>) {
        *self.field_mut(path) = value.into();
    }

    pub fn field(&self, path: FieldPath) -> &str {
        match path {
            FieldPath::Lesson(field) => match field {
                LessonField::Title => &self.title,
                LessonField::Subject => &self.subject,
                LessonField::GradeLevel => &self.grade_level,
                LessonField::Duration => &self.duration,
                LessonField::Objectives => &self.objectives,
                LessonField::Standards => &self.standards,
                LessonField::Assessment => &self.assessment,
                LessonField::Differentiation => &self.differentiation,
            },
            FieldPath::Procedure(field) => match field {
                ProcedureField::AnticipatorySet => &self.procedure.anticipatory_set,
                ProcedureField::DirectInstruction => &self.procedure.direct_instruction,
                ProcedureField::GuidedPractice => &self.procedure.guided_practice,
                ProcedureField::IndependentPractice => &self.procedure.independent_practice,
                ProcedureField::Closure => &self.procedure.closure,
            },
        }
    }

    fn field_mut(&mut self, path: FieldPath) -> &mut String {
        match path {
            FieldPath::Lesson(field) => match field {
                LessonField::Title => &mut self.title,
                LessonField::Subject => &mut self.subject,
                LessonField::GradeLevel => &mut self.grade_level,
                LessonField::Duration => &mut self.duration,
                LessonField::Objectives => &mut self.objectives,
                LessonField::Standards => &mut self.standards,
                LessonField::Assessment => &mut self.assessment,
                LessonField::Differentiation => &mut self.differentiation,
            },
            FieldPath::Procedure(field) => match field {
                ProcedureField::AnticipatorySet => &mut self.procedure.anticipatory_set,
                ProcedureField::DirectInstruction => &mut self.procedure.direct_instruction,
                ProcedureField::GuidedPractice => &mut self.procedure.guided_practice,
                ProcedureField::IndependentPractice => &mut self.procedure.independent_practice,
                ProcedureField::Closure => &mut self.procedure.closure,
            },
        }
    }

    pub fn set_status(&mut self, status: LessonStatus) {
        self.status = status;
    }

    // -- Materials --

    /// Append a material, trimmed. Blank input is ignored.
    pub fn add_material(&mut self, text: &str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.materials.push(trimmed.to_owned());
        }
    }

    /// Remove the material at `index`. Out-of-range indexes are ignored.
    pub fn remove_material(&mut self, index: usize) {
        if index < self.materials.len() {
            self.materials.remove(index);
        }
    }

    // -- Class schedules --

    /// Append an empty schedule row and return its id.
    pub fn add_class_schedule(&mut self) -> Uuid {
        let row = ClassSchedule::new();
        let id = row.id;
        self.class_schedules.push(row);
        id
    }

    /// Set one field of the row with `id`. Unknown ids are ignored.
    pub fn update_class_schedule(&mut self, id: Uuid, field: ScheduleField, value: impl Into<String>) {
        let Some(row) = self.class_schedules.iter_mut().find(|r| r.id == id) else {
            return;
        };
        let slot = match field {
            ScheduleField::ClassName => &mut row.class_name,
            ScheduleField::Period => &mut row.period,
            ScheduleField::Room => &mut row.room,
            ScheduleField::SpecificNotes => &mut row.specific_notes,
        };
        *slot = value.into();
    }

    /// Remove the row with `id`. Unknown ids are ignored.
    pub fn remove_class_schedule(&mut self, id: Uuid) {
        self.class_schedules.retain(|r| r.id != id);
    }

    // -- Generated content --

    /// Merge a partial lesson into the draft.
    ///
    /// Present top-level fields overwrite; absent ones are untouched.
    /// `materials` and `class_schedules` are replaced wholesale when present.
    /// The procedure is merged phase by phase.
    pub fn merge_generated(&mut self, partial: PartialLesson) {
        let PartialLesson {
            title,
            subject,
            grade_level,
            duration,
            objectives,
            standards,
            materials,
            class_schedules,
            procedure,
            assessment,
            differentiation,
            status,
        } = partial;

        overwrite(&mut self.title, title);
        overwrite(&mut self.subject, subject);
        overwrite(&mut self.grade_level, grade_level);
        overwrite(&mut self.duration, duration);
        overwrite(&mut self.objectives, objectives);
        overwrite(&mut self.standards, standards);
        overwrite(&mut self.materials, materials);
        overwrite(&mut self.class_schedules, class_schedules);
        overwrite(&mut self.assessment, assessment);
        overwrite(&mut self.differentiation, differentiation);
        overwrite(&mut self.status, status);

        if let Some(PartialProcedure {
            anticipatory_set,
            direct_instruction,
            guided_practice,
            independent_practice,
            closure,
        }) = procedure
        {
            overwrite(&mut self.procedure.anticipatory_set, anticipatory_set);
            overwrite(&mut self.procedure.direct_instruction, direct_instruction);
            overwrite(&mut self.procedure.guided_practice, guided_practice);
            overwrite(&mut self.procedure.independent_practice, independent_practice);
            overwrite(&mut self.procedure.closure, closure);
        }
    }

    /// Build the generation request for this draft.
    ///
    /// Title, grade level and subject must all be filled in.
    pub fn generation_request(&self) -> Result<GenerationRequest, ValidationRejected> {
        let missing = self.missing_required_fields();
        if !missing.is_empty() {
            return Err(ValidationRejected(format!(
                "enter a title, subject, and grade level before generating (missing: {})",
                missing.join(", ")
            )));
        }
        Ok(GenerationRequest {
            topic: self.title.clone(),
            grade: self.grade_level.clone(),
            subject: self.subject.clone(),
        })
    }

    /// Check the fields a lesson cannot be saved without.
    pub fn validate_for_save(&self) -> Result<(), ValidationRejected> {
        let missing = self.missing_required_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationRejected(format!(
                "a lesson needs a title, subject, and grade level (missing: {})",
                missing.join(", ")
            )))
        }
    }

    fn missing_required_fields(&self) -> Vec<&'static str> {
        [
            (LessonField::Title, &self.title),
            (LessonField::Subject, &self.subject),
            (LessonField::GradeLevel, &self.grade_level),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field.as_str())
        .collect()
    }

    // -- Commit --

    /// Finalize the draft into a storable lesson.
    ///
    /// Assigns a fresh id and creation time if the draft has none; an
    /// existing id and creation time are kept verbatim.
    pub fn commit(&self) -> LessonPlan {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let date = if self.date.is_empty() {
            creation_date(created_at)
        } else {
            self.date.clone()
        };
        LessonPlan {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            title: self.title.clone(),
            subject: self.subject.clone(),
            grade_level: self.grade_level.clone(),
            duration: self.duration.clone(),
            date,
            objectives: self.objectives.clone(),
            standards: self.standards.clone(),
            materials: self.materials.clone(),
            class_schedules: self.class_schedules.clone(),
            procedure: self.procedure.clone(),
            assessment: self.assessment.clone(),
            differentiation: self.differentiation.clone(),
            status: self.status,
            created_at,
        }
    }
}

impl Default for LessonDraft {
    fn default() -> Self {
        Self::blank()
    }
}

impl From<LessonPlan> for LessonDraft {
    fn from(lesson: LessonPlan) -> Self {
        Self {
            id: Some(lesson.id),
            title: lesson.title,
            subject: lesson.subject,
            grade_level: lesson.grade_level,
            duration: lesson.duration,
            date: lesson.date,
            objectives: lesson.objectives,
            standards: lesson.standards,
            materials: lesson.materials,
            class_schedules: lesson.class_schedules,
            procedure: lesson.procedure,
            assessment: lesson.assessment,
            differentiation: lesson.differentiation,
            status: lesson.status,
            created_at: Some(lesson.created_at),
        }
    }
}

fn overwrite<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
