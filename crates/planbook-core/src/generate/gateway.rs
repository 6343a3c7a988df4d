//! One-shot generation call: invoke the backend, bound it in time, and
//! validate the response against the lesson schema.

use std::time::Duration;

use tracing::{debug, warn};

use super::contract::{GeneratedLesson, GenerationFailed, GenerationRequest, parse_generated_lesson};
use super::trait_def::LessonGenerator;

/// Run a single generation request.
///
/// Backend errors, an elapsed `timeout`, and responses that do not match
/// the schema all come back as [`GenerationFailed`].
pub async fn request_generation(
    generator: &dyn LessonGenerator,
    request: &GenerationRequest,
    timeout: Option<Duration>,
) -> Result<GeneratedLesson, GenerationFailed> {
    debug!(generator = generator.name(), topic = %request.topic, "requesting generated lesson");

    let call = generator.generate(request);
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(generator = generator.name(), ?limit, "generation timed out");
                return Err(GenerationFailed::new(format!("no response within {limit:?}")));
            }
        },
        None => call.await,
    };

    let raw = outcome.map_err(|e| {
        warn!(generator = generator.name(), error = %e, "generation call failed");
        GenerationFailed::new(format!("{e:#}"))
    })?;

    parse_generated_lesson(&raw).inspect_err(|e| {
        warn!(generator = generator.name(), reason = %e.reason, "generation response rejected");
    })
}
