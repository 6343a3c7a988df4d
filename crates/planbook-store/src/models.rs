use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Publication status of a lesson plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    #[default]
    Draft,
    Published,
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Published => "published",
        };
        f.write_str(s)
    }
}

impl FromStr for LessonStatus {
    type Err = LessonStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(LessonStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`LessonStatus`] string.
#[derive(Debug, Clone)]
pub struct LessonStatusParseError(pub String);

impl fmt::Display for LessonStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid lesson status: {:?} (expected draft or published)",
            self.0
        )
    }
}

impl std::error::Error for LessonStatusParseError {}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// The five teaching phases of a lesson. Every key is always present on
/// disk, even when the text is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub anticipatory_set: String,
    pub direct_instruction: String,
    pub guided_practice: String,
    pub independent_practice: String,
    pub closure: String,
}

/// One row of the per-class schedule table attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchedule {
    /// Row identity, unique within the owning lesson and never reused.
    pub id: Uuid,
    pub class_name: String,
    pub period: String,
    pub room: String,
    pub specific_notes: String,
}

impl ClassSchedule {
    /// A fresh row with a new id and all text fields empty.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            class_name: String::new(),
            period: String::new(),
            room: String::new(),
            specific_notes: String::new(),
        }
    }
}

impl Default for ClassSchedule {
    fn default() -> Self {
        Self::new()
    }
}

/// A persisted lesson plan document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub grade_level: String,
    pub duration: String,
    /// Calendar date of creation (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: String,
    pub objectives: String,
    pub standards: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub class_schedules: Vec<ClassSchedule>,
    pub procedure: Procedure,
    pub assessment: String,
    pub differentiation: String,
    #[serde(default)]
    pub status: LessonStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// The signed-in author. Held in its own slot, independent of the lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

/// Format the calendar date stored alongside `created_at`.
pub fn creation_date(created_at: DateTime<Utc>) -> String {
    created_at.format("%Y-%m-%d").to_string()
}
