//! Integration tests for AI-assisted prefilling through the session.
//!
//! Uses in-process fake generators, plus a shell-script stand-in for the
//! `claude` binary on Unix.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;

use planbook_core::editor::{LessonField, ProcedureField};
use planbook_core::generate::{ClaudeCodeGenerator, GenerationRequest, LessonGenerator, request_generation};
use planbook_core::{GenerationFailed, GenerationOutcome, Session, SessionError, View};
use planbook_store::queries::{lessons, session as user_queries};
use planbook_test_utils::{create_test_store, sample_user};

const FULL_PAYLOAD: &str = r#"{
    "title": "Photosynthesis: How Plants Make Food",
    "duration": "50 minutes",
    "objectives": "Describe the inputs and outputs of photosynthesis.",
    "standards": "MS-LS1-6",
    "materials": ["Spinach leaves", "Baking soda", "Syringes"],
    "procedure": {
        "anticipatorySet": "Show a time-lapse of a growing plant.",
        "directInstruction": "Walk through the photosynthesis equation.",
        "guidedPractice": "Floating leaf disk lab in pairs.",
        "independentPractice": "Diagram the process from memory.",
        "closure": "Exit ticket: where does a tree's mass come from?"
    },
    "assessment": "Exit ticket and lab sheet.",
    "differentiation": "Sentence starters and labeled diagrams."
}"#;

/// Returns a fixed response and counts how often it was called.
struct CannedGenerator {
    response: Result<&'static str, &'static str>,
    calls: Arc<AtomicUsize>,
}

impl CannedGenerator {
    fn ok(response: &'static str) -> Self {
        Self {
            response: Ok(response),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(message: &'static str) -> Self {
        Self {
            response: Err(message),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LessonGenerator for CannedGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.response {
            Ok(text) => Ok(text.to_owned()),
            Err(message) => bail!("{message}"),
        }
    }
}

/// Never answers within any test's patience.
struct StalledGenerator;

#[async_trait]
impl LessonGenerator for StalledGenerator {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(FULL_PAYLOAD.to_owned())
    }
}

async fn editing_session() -> (Session, tempfile::TempDir) {
    let (store, dir) = create_test_store().await;
    user_queries::save_user(&store, &sample_user()).await.unwrap();
    let mut session = Session::load(store).await.unwrap();
    let draft = session.start_create().unwrap();
    draft.set_field(LessonField::Title.into(), "Photosynthesis");
    draft.set_field(LessonField::Subject.into(), "Biology");
    draft.set_field(LessonField::GradeLevel.into(), "7th Grade");
    (session, dir)
}

#[tokio::test]
async fn generate_merge_commit_upsert_end_to_end() {
    let (mut session, _dir) = editing_session().await;
    let generator = CannedGenerator::ok(FULL_PAYLOAD);

    let outcome = session.generate(&generator, None).await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Applied);
    assert_eq!(generator.calls(), 1);

    let draft = session.editor().unwrap();
    assert_eq!(draft.title, "Photosynthesis: How Plants Make Food");
    // Fields the generator does not return are kept.
    assert_eq!(draft.subject, "Biology");
    assert_eq!(draft.grade_level, "7th Grade");

    let saved = session.save().await.unwrap();
    let listed = lessons::list_lessons(session.store()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], saved);
    assert_eq!(listed[0].materials.len(), 3);
    assert_eq!(listed[0].procedure.anticipatory_set, "Show a time-lapse of a growing plant.");
    assert_eq!(listed[0].procedure.direct_instruction, "Walk through the photosynthesis equation.");
    assert_eq!(listed[0].procedure.guided_practice, "Floating leaf disk lab in pairs.");
    assert_eq!(listed[0].procedure.independent_practice, "Diagram the process from memory.");
    assert_eq!(
        listed[0].procedure.closure,
        "Exit ticket: where does a tree's mass come from?"
    );
    assert_eq!(session.lessons()[0].id, saved.id);
}

#[tokio::test]
async fn missing_grade_is_rejected_before_calling_generator() {
    let (mut session, _dir) = editing_session().await;
    session
        .editor_mut()
        .unwrap()
        .set_field(LessonField::GradeLevel.into(), "");
    let before = session.editor().unwrap().clone();
    let generator = CannedGenerator::ok(FULL_PAYLOAD);

    let err = session.generate(&generator, None).await.unwrap_err();
    assert!(matches!(err, SessionError::ValidationRejected(_)));
    assert_eq!(generator.calls(), 0);
    assert_eq!(session.editor().unwrap(), &before);
    assert!(!session.is_generating());
}

#[tokio::test]
async fn failed_generation_leaves_buffer_unchanged() {
    let (mut session, _dir) = editing_session().await;
    session
        .editor_mut()
        .unwrap()
        .set_field(ProcedureField::Closure.into(), "Think-pair-share");
    let before = session.editor().unwrap().clone();

    let generator = CannedGenerator::failing("upstream unavailable");
    let err = session.generate(&generator, None).await.unwrap_err();
    assert!(matches!(err, SessionError::GenerationFailed(_)));
    assert_eq!(session.editor().unwrap(), &before);
    assert!(!session.is_generating());

    // The user may retry once the failure has been reported.
    let retry = CannedGenerator::ok(FULL_PAYLOAD);
    assert_eq!(
        session.generate(&retry, None).await.unwrap(),
        GenerationOutcome::Applied
    );
}

#[tokio::test]
async fn incomplete_response_is_a_failure_not_a_partial_merge() {
    let (mut session, _dir) = editing_session().await;
    let before = session.editor().unwrap().clone();
    let generator = CannedGenerator::ok(r#"{"title": "Only a title", "duration": "5 min"}"#);

    let err = session.generate(&generator, None).await.unwrap_err();
    assert!(matches!(err, SessionError::GenerationFailed(_)));
    assert_eq!(session.editor().unwrap(), &before);
}

#[tokio::test]
async fn only_one_request_in_flight() {
    let (mut session, _dir) = editing_session().await;
    let ticket = session.begin_generation().unwrap();
    assert!(session.is_generating());
    assert!(matches!(
        session.begin_generation(),
        Err(SessionError::GenerationInFlight)
    ));

    let outcome = session
        .finish_generation(ticket, Err(GenerationFailed::new("boom")))
        .unwrap_err();
    assert!(matches!(outcome, SessionError::GenerationFailed(_)));
    assert!(!session.is_generating());
    assert!(session.begin_generation().is_ok());
}

#[tokio::test(start_paused = true)]
async fn dropped_generate_call_releases_the_buffer() {
    let (mut session, _dir) = editing_session().await;
    let before = session.editor().unwrap().clone();

    let waited =
        tokio::time::timeout(Duration::from_secs(5), session.generate(&StalledGenerator, None)).await;
    assert!(waited.is_err());

    assert!(!session.is_generating());
    assert_eq!(session.editor().unwrap(), &before);
    assert!(session.begin_generation().is_ok());
}

#[tokio::test]
async fn abandoned_ticket_frees_the_buffer_once() {
    let (mut session, _dir) = editing_session().await;
    let ticket = session.begin_generation().unwrap();
    assert!(session.abandon_generation(ticket));
    assert!(!session.is_generating());

    let ticket = session.begin_generation().unwrap();
    session.cancel();
    assert!(!session.abandon_generation(ticket));
}

#[tokio::test]
async fn late_result_after_cancel_is_discarded() {
    let (mut session, _dir) = editing_session().await;
    let ticket = session.begin_generation().unwrap();
    let generator = CannedGenerator::ok(FULL_PAYLOAD);
    let result = request_generation(&generator, ticket.request(), None).await;

    session.cancel();
    assert_eq!(session.view(), View::LessonList);

    let outcome = session.finish_generation(ticket, result).unwrap();
    assert_eq!(outcome, GenerationOutcome::Discarded);
    assert!(session.editor().is_none());
    assert_eq!(session.view(), View::LessonList);
    assert!(lessons::list_lessons(session.store()).await.unwrap().is_empty());
}

#[tokio::test]
async fn late_result_never_reaches_a_different_buffer() {
    let (mut session, _dir) = editing_session().await;
    let ticket = session.begin_generation().unwrap();
    let generator = CannedGenerator::ok(FULL_PAYLOAD);
    let result = request_generation(&generator, ticket.request(), None).await;

    // The author abandons the first lesson and starts another.
    session.cancel();
    let draft = session.start_create().unwrap();
    draft.set_field(LessonField::Title.into(), "Fractions");
    let before = session.editor().unwrap().clone();

    let outcome = session.finish_generation(ticket, result).unwrap();
    assert_eq!(outcome, GenerationOutcome::Discarded);
    assert_eq!(session.editor().unwrap(), &before);
}

#[tokio::test]
async fn generate_without_open_editor() {
    let (store, _dir) = create_test_store().await;
    user_queries::save_user(&store, &sample_user()).await.unwrap();
    let mut session = Session::load(store).await.unwrap();
    let generator = CannedGenerator::ok(FULL_PAYLOAD);
    assert!(matches!(
        session.generate(&generator, None).await,
        Err(SessionError::NoOpenEditor)
    ));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn merge_keeps_existing_schedule_rows() {
    let (mut session, _dir) = editing_session().await;
    let row = session.editor_mut().unwrap().add_class_schedule();
    session.generate(&CannedGenerator::ok(FULL_PAYLOAD), None).await.unwrap();
    let draft = session.editor().unwrap();
    assert_eq!(draft.class_schedules.len(), 1);
    assert_eq!(draft.class_schedules[0].id, row);
}

// -- Claude Code backend with a stand-in binary -------------------------------

#[cfg(unix)]
fn fake_claude(dir: &std::path::Path, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let envelope = serde_json::json!({
        "type": "result",
        "subtype": "success",
        "is_error": false,
        "result": body,
    });
    let payload_path = dir.join("envelope.json");
    std::fs::write(&payload_path, envelope.to_string()).unwrap();

    let script_path = dir.join("fake_claude.sh");
    std::fs::write(
        &script_path,
        format!(
            "#!/bin/sh\ncat > /dev/null\ncat '{}'\n",
            payload_path.display()
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();
    script_path.to_string_lossy().into_owned()
}

#[cfg(unix)]
#[tokio::test]
async fn claude_code_generator_fills_the_buffer() {
    let (mut session, dir) = editing_session().await;
    let fenced = format!("```json\n{FULL_PAYLOAD}\n```");
    let generator = ClaudeCodeGenerator::with_binary(fake_claude(dir.path(), &fenced));

    let outcome = session
        .generate(&generator, Some(Duration::from_secs(30)))
        .await
        .unwrap();
    assert_eq!(outcome, GenerationOutcome::Applied);
    assert_eq!(session.editor().unwrap().duration, "50 minutes");
}

#[cfg(unix)]
#[tokio::test]
async fn claude_code_generator_nonzero_exit_is_a_failure() {
    use std::os::unix::fs::PermissionsExt;

    let (mut session, dir) = editing_session().await;
    let script_path = dir.path().join("failing_claude.sh");
    std::fs::write(
        &script_path,
        "#!/bin/sh\ncat > /dev/null\necho 'not logged in' >&2\nexit 2\n",
    )
    .unwrap();
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();
    let before = session.editor().unwrap().clone();

    let generator = ClaudeCodeGenerator::with_binary(script_path.to_string_lossy());
    let err = session.generate(&generator, None).await.unwrap_err();
    match err {
        SessionError::GenerationFailed(e) => assert!(e.reason.contains("not logged in")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.editor().unwrap(), &before);
}
