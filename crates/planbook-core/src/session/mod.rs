//! Navigation and session state.
//!
//! A [`Session`] owns the store handle, the last known lesson collection,
//! the signed-in user, the active [`View`], and at most one open editor
//! buffer. Every mutation of the collection goes through the store and the
//! snapshot is replaced with the collection the store returns.
//!
//! Generation is split into [`Session::begin_generation`] and
//! [`Session::finish_generation`] so the call itself can run without
//! holding the session. Each opened buffer gets a fresh epoch; a result
//! whose ticket does not match the open buffer's epoch is dropped.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use planbook_store::SlotStore;
use planbook_store::models::{LessonPlan, User};
use planbook_store::queries::{lessons as lesson_queries, session as user_queries};

use crate::editor::{LessonDraft, ValidationRejected};
use crate::generate::{
    GeneratedLesson, GenerationFailed, GenerationRequest, LessonGenerator, request_generation,
};

/// Which view the session is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    SignIn,
    LessonList,
    Editor,
    Settings,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    ValidationRejected(#[from] ValidationRejected),

    #[error(transparent)]
    GenerationFailed(#[from] GenerationFailed),

    #[error("lesson {0} not found")]
    NotFound(Uuid),

    #[error("no lesson is open for editing")]
    NoOpenEditor,

    #[error("a generation request is already running for this lesson")]
    GenerationInFlight,

    #[error("not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Proof that a generation request was started for a specific buffer.
#[derive(Debug)]
pub struct GenerationTicket {
    epoch: u64,
    request: GenerationRequest,
}

impl GenerationTicket {
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// What happened to a finished generation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Merged into the buffer it was requested for.
    Applied,
    /// The buffer was closed or replaced in the meantime; nothing changed.
    Discarded,
}

#[derive(Debug)]
struct OpenEditor {
    draft: LessonDraft,
    epoch: u64,
    generating: bool,
}

/// Session state for one author.
#[derive(Debug)]
pub struct Session {
    store: SlotStore,
    user: Option<User>,
    lessons: Vec<LessonPlan>,
    view: View,
    editor: Option<OpenEditor>,
    next_epoch: u64,
}

impl Session {
    /// Load the user and lesson slots and pick the starting view: the
    /// lesson list when someone is signed in, the sign-in view otherwise.
    pub async fn load(store: SlotStore) -> Result<Self, SessionError> {
        let user = user_queries::load_user(&store).await?;
        let lessons = lesson_queries::list_lessons(&store).await?;
        let view = if user.is_some() {
            View::LessonList
        } else {
            View::SignIn
        };
        debug!(?view, lessons = lessons.len(), "session loaded");
        Ok(Self {
            store,
            user,
            lessons,
            view,
            editor: None,
            next_epoch: 0,
        })
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The last known collection, most recently saved first.
    pub fn lessons(&self) -> &[LessonPlan] {
        &self.lessons
    }

    pub fn store(&self) -> &SlotStore {
        &self.store
    }

    fn require_user(&self) -> Result<&User, SessionError> {
        self.user.as_ref().ok_or(SessionError::NotSignedIn)
    }

    // -- Identity --

    /// Sign in with a placeholder identity. No credentials are checked.
    pub async fn sign_in(
        &mut self,
        email: &str,
        name: &str,
        school: Option<&str>,
    ) -> Result<&User, SessionError> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.trim().to_owned(),
            name: name.trim().to_owned(),
            school: school
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        };
        user_queries::save_user(&self.store, &user).await?;
        self.editor = None;
        self.view = View::LessonList;
        Ok(self.user.insert(user))
    }

    /// Forget the signed-in user. Any open buffer is discarded.
    pub async fn sign_out(&mut self) -> Result<(), SessionError> {
        user_queries::clear_user(&self.store).await?;
        self.user = None;
        self.editor = None;
        self.view = View::SignIn;
        Ok(())
    }

    /// Switch to the read-only settings view.
    pub fn show_settings(&mut self) -> Result<&User, SessionError> {
        if self.user.is_none() {
            return Err(SessionError::NotSignedIn);
        }
        self.editor = None;
        self.view = View::Settings;
        self.require_user()
    }

    /// Return to the lesson list. Any open buffer is discarded.
    pub fn show_list(&mut self) -> Result<(), SessionError> {
        self.require_user()?;
        self.editor = None;
        self.view = View::LessonList;
        Ok(())
    }

    // -- Editor lifecycle --

    fn open_editor(&mut self, draft: LessonDraft) -> &mut LessonDraft {
        self.next_epoch += 1;
        self.view = View::Editor;
        let open = self.editor.insert(OpenEditor {
            draft,
            epoch: self.next_epoch,
            generating: false,
        });
        &mut open.draft
    }

    /// Open a blank buffer for a new lesson.
    pub fn start_create(&mut self) -> Result<&mut LessonDraft, SessionError> {
        self.require_user()?;
        debug!("editing new lesson");
        Ok(self.open_editor(LessonDraft::open(None)))
    }

    /// Open a buffer seeded from the lesson with `id` in the current
    /// snapshot. If there is no such lesson the session stays where it is.
    pub fn start_edit(&mut self, id: Uuid) -> Result<&mut LessonDraft, SessionError> {
        self.require_user()?;
        let Some(lesson) = self.lessons.iter().find(|l| l.id == id) else {
            return Err(SessionError::NotFound(id));
        };
        let draft = LessonDraft::open(Some(lesson));
        debug!(lesson_id = %id, "editing lesson");
        Ok(self.open_editor(draft))
    }

    pub fn editor(&self) -> Option<&LessonDraft> {
        self.editor.as_ref().map(|e| &e.draft)
    }

    pub fn editor_mut(&mut self) -> Option<&mut LessonDraft> {
        self.editor.as_mut().map(|e| &mut e.draft)
    }

    pub fn is_generating(&self) -> bool {
        self.editor.as_ref().is_some_and(|e| e.generating)
    }

    /// Commit the open buffer and upsert it into the store.
    ///
    /// On success the buffer is closed and the session returns to the
    /// list. A validation or store failure leaves the buffer open.
    pub async fn save(&mut self) -> Result<LessonPlan, SessionError> {
        let open = self.editor.as_ref().ok_or(SessionError::NoOpenEditor)?;
        open.draft.validate_for_save()?;

        let lesson = open.draft.commit();
        self.lessons = lesson_queries::upsert_lesson(&self.store, lesson.clone()).await?;
        self.editor = None;
        self.view = View::LessonList;

        info!(lesson_id = %lesson.id, title = %lesson.title, "lesson saved from editor");
        Ok(lesson)
    }

    /// Throw the open buffer away and return to the list.
    pub fn cancel(&mut self) {
        if self.editor.take().is_some() {
            debug!("editor cancelled");
        }
        self.view = if self.user.is_some() {
            View::LessonList
        } else {
            View::SignIn
        };
    }

    /// Delete a lesson by id. Returns whether anything was removed.
    ///
    /// An open buffer holding a copy of the lesson is left alone.
    pub async fn delete(&mut self, id: Uuid) -> Result<bool, SessionError> {
        self.require_user()?;
        let existed = self.lessons.iter().any(|l| l.id == id);
        self.lessons = lesson_queries::delete_lesson(&self.store, id).await?;
        if existed {
            info!(lesson_id = %id, "lesson removed from list");
        }
        Ok(existed)
    }

    // -- Generation --

    /// Validate the open buffer and mark a generation request in flight.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, SessionError> {
        let open = self.editor.as_mut().ok_or(SessionError::NoOpenEditor)?;
        if open.generating {
            return Err(SessionError::GenerationInFlight);
        }
        let request = open.draft.generation_request()?;
        open.generating = true;
        debug!(epoch = open.epoch, topic = %request.topic, "generation started");
        Ok(GenerationTicket {
            epoch: open.epoch,
            request,
        })
    }

    /// Deliver the result of a generation request.
    ///
    /// The result is merged only if the buffer it was requested for is
    /// still open. A failure leaves the buffer unchanged.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<GeneratedLesson, GenerationFailed>,
    ) -> Result<GenerationOutcome, SessionError> {
        let open = match self.editor.as_mut() {
            Some(open) if open.epoch == ticket.epoch && open.generating => open,
            _ => {
                warn!(epoch = ticket.epoch, "generation result arrived for a closed buffer; discarded");
                return Ok(GenerationOutcome::Discarded);
            }
        };

        open.generating = false;
        let generated = result?;
        open.draft.merge_generated(generated.into());
        info!(epoch = ticket.epoch, "generated content merged");
        Ok(GenerationOutcome::Applied)
    }

    /// Give up on a request without delivering a result.
    ///
    /// Returns `false` if the ticket's buffer is gone or no longer waiting.
    pub fn abandon_generation(&mut self, ticket: GenerationTicket) -> bool {
        self.release_generation(ticket.epoch)
    }

    fn release_generation(&mut self, epoch: u64) -> bool {
        match self.editor.as_mut() {
            Some(open) if open.epoch == epoch && open.generating => {
                open.generating = false;
                debug!(epoch, "generation abandoned");
                true
            }
            _ => false,
        }
    }

    /// Run one generation request against the open buffer end to end.
    ///
    /// Dropping the returned future before it completes releases the
    /// buffer, so a caller's own timeout or `select!` never leaves it stuck.
    pub async fn generate(
        &mut self,
        generator: &dyn LessonGenerator,
        timeout: Option<Duration>,
    ) -> Result<GenerationOutcome, SessionError> {
        let ticket = self.begin_generation()?;
        let mut in_flight = InFlight {
            session: self,
            epoch: Some(ticket.epoch),
        };
        let result = request_generation(generator, ticket.request(), timeout).await;
        in_flight.epoch = None;
        in_flight.session.finish_generation(ticket, result)
    }
}

/// Clears the in-flight flag if [`Session::generate`] is dropped mid-request.
struct InFlight<'a> {
    session: &'a mut Session,
    epoch: Option<u64>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(epoch) = self.epoch.take() {
            self.session.release_generation(epoch);
        }
    }
}
