//! Addressable text fields of a lesson being edited.
//!
//! The set of editable paths is closed: a [`FieldPath`] is either a
//! top-level scalar of the lesson or one of the five procedure phases.
//! Text forms (`"gradeLevel"`, `"procedure.closure"`) are accepted at the
//! edges via [`FromStr`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Free-text scalar fields at the top level of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonField {
    Title,
    Subject,
    GradeLevel,
    Duration,
    Objectives,
    Standards,
    Assessment,
    Differentiation,
}

impl LessonField {
    pub const ALL: [LessonField; 8] = [
        Self::Title,
        Self::Subject,
        Self::GradeLevel,
        Self::Duration,
        Self::Objectives,
        Self::Standards,
        Self::Assessment,
        Self::Differentiation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subject => "subject",
            Self::GradeLevel => "gradeLevel",
            Self::Duration => "duration",
            Self::Objectives => "objectives",
            Self::Standards => "standards",
            Self::Assessment => "assessment",
            Self::Differentiation => "differentiation",
        }
    }
}

/// The five phases of the lesson procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureField {
    AnticipatorySet,
    DirectInstruction,
    GuidedPractice,
    IndependentPractice,
    Closure,
}

impl ProcedureField {
    pub const ALL: [ProcedureField; 5] = [
        Self::AnticipatorySet,
        Self::DirectInstruction,
        Self::GuidedPractice,
        Self::IndependentPractice,
        Self::Closure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnticipatorySet => "anticipatorySet",
            Self::DirectInstruction => "directInstruction",
            Self::GuidedPractice => "guidedPractice",
            Self::IndependentPractice => "independentPractice",
            Self::Closure => "closure",
        }
    }
}

/// A settable text field: a top-level scalar or a procedure phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Lesson(LessonField),
    Procedure(ProcedureField),
}

impl From<LessonField> for FieldPath {
    fn from(field: LessonField) -> Self {
        Self::Lesson(field)
    }
}

impl From<ProcedureField> for FieldPath {
    fn from(field: ProcedureField) -> Self {
        Self::Procedure(field)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lesson(field) => f.write_str(field.as_str()),
            Self::Procedure(field) => write!(f, "procedure.{}", field.as_str()),
        }
    }
}

/// Text fields of a class schedule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleField {
    ClassName,
    Period,
    Room,
    SpecificNotes,
}

impl ScheduleField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClassName => "className",
            Self::Period => "period",
            Self::Room => "room",
            Self::SpecificNotes => "specificNotes",
        }
    }
}

impl fmt::Display for ScheduleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldPathParseError {
    #[error("unknown lesson field {0:?}")]
    UnknownField(String),

    #[error("unknown procedure field {0:?} (expected anticipatorySet, directInstruction, guidedPractice, independentPractice, or closure)")]
    UnknownProcedureField(String),

    #[error("field path {0:?} is nested too deeply")]
    TooDeep(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown class schedule field {0:?} (expected className, period, room, or specificNotes)")]
pub struct ScheduleFieldParseError(pub String);

/// Lowercase and drop `_`/`-` so `grade_level`, `grade-level` and
/// `gradeLevel` all match.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for LessonField {
    type Err = FieldPathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Self::ALL
            .into_iter()
            .find(|f| normalize(f.as_str()) == key)
            .ok_or_else(|| FieldPathParseError::UnknownField(s.to_owned()))
    }
}

impl FromStr for ProcedureField {
    type Err = FieldPathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Self::ALL
            .into_iter()
            .find(|f| normalize(f.as_str()) == key)
            .ok_or_else(|| FieldPathParseError::UnknownProcedureField(s.to_owned()))
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let head = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (None, _) => head.parse::<LessonField>().map(Self::Lesson),
            (Some(child), None) if normalize(head) == "procedure" => {
                child.parse::<ProcedureField>().map(Self::Procedure)
            }
            (Some(_), None) => Err(FieldPathParseError::UnknownField(head.to_owned())),
            (Some(_), Some(_)) => Err(FieldPathParseError::TooDeep(s.to_owned())),
        }
    }
}

impl FromStr for ScheduleField {
    type Err = ScheduleFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "classname" | "class" | "name" => Ok(Self::ClassName),
            "period" => Ok(Self::Period),
            "room" => Ok(Self::Room),
            "specificnotes" | "notes" => Ok(Self::SpecificNotes),
            _ => Err(ScheduleFieldParseError(s.to_owned())),
        }
    }
}
