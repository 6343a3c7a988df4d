//! Lesson authoring core: the editor buffer, the generation gateway, and
//! the navigation/session state that ties them to the store.

pub mod editor;
pub mod generate;
pub mod session;

pub use editor::{FieldPath, LessonDraft, LessonField, ProcedureField, ScheduleField, ValidationRejected};
pub use generate::{GenerationFailed, GenerationRequest, LessonGenerator};
pub use session::{GenerationOutcome, GenerationTicket, Session, SessionError, View};
