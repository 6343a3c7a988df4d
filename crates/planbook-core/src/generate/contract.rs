//! Request/response shapes exchanged with the content generator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use planbook_store::models::{ClassSchedule, LessonStatus, Procedure};

/// What the generator is asked to draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The lesson title, used as the topic.
    pub topic: String,
    pub grade: String,
    pub subject: String,
}

/// A successful generator response.
///
/// Every field is required; a response missing any of them does not
/// deserialize and is treated as a failed generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLesson {
    pub title: String,
    pub duration: String,
    pub objectives: String,
    pub standards: String,
    pub materials: Vec<String>,
    pub procedure: Procedure,
    pub assessment: String,
    pub differentiation: String,
}

/// A lesson-shaped payload where any field may be absent. Used only as a
/// merge source for an open editor buffer, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialLesson {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub duration: Option<String>,
    pub objectives: Option<String>,
    pub standards: Option<String>,
    pub materials: Option<Vec<String>>,
    pub class_schedules: Option<Vec<ClassSchedule>>,
    pub procedure: Option<PartialProcedure>,
    pub assessment: Option<String>,
    pub differentiation: Option<String>,
    pub status: Option<LessonStatus>,
}

/// Procedure phases that may each be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialProcedure {
    pub anticipatory_set: Option<String>,
    pub direct_instruction: Option<String>,
    pub guided_practice: Option<String>,
    pub independent_practice: Option<String>,
    pub closure: Option<String>,
}

impl From<Procedure> for PartialProcedure {
    fn from(p: Procedure) -> Self {
        Self {
            anticipatory_set: Some(p.anticipatory_set),
            direct_instruction: Some(p.direct_instruction),
            guided_practice: Some(p.guided_practice),
            independent_practice: Some(p.independent_practice),
            closure: Some(p.closure),
        }
    }
}

impl From<GeneratedLesson> for PartialLesson {
    fn from(g: GeneratedLesson) -> Self {
        Self {
            title: Some(g.title),
            duration: Some(g.duration),
            objectives: Some(g.objectives),
            standards: Some(g.standards),
            materials: Some(g.materials),
            procedure: Some(g.procedure.into()),
            assessment: Some(g.assessment),
            differentiation: Some(g.differentiation),
            ..Self::default()
        }
    }
}

/// The generator did not produce a usable lesson.
///
/// Transport errors, timeouts, malformed output and missing fields all
/// collapse into this one condition. The reason is kept for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("content generation failed: {reason}")]
pub struct GenerationFailed {
    pub reason: String,
}

impl GenerationFailed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Decode a raw generator response into a [`GeneratedLesson`].
///
/// Accepts bare JSON or JSON wrapped in a Markdown code fence.
pub fn parse_generated_lesson(raw: &str) -> Result<GeneratedLesson, GenerationFailed> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(GenerationFailed::new("empty response"));
    }
    serde_json::from_str(body)
        .map_err(|e| GenerationFailed::new(format!("response does not match the lesson schema: {e}")))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
