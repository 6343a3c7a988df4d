//! Editor buffer: field paths and the mutable lesson draft.

pub mod buffer;
pub mod field;

pub use buffer::{LessonDraft, ValidationRejected};
pub use field::{
    FieldPath, FieldPathParseError, LessonField, ProcedureField, ScheduleField,
    ScheduleFieldParseError,
};
