//! The `LessonGenerator` trait -- the seam to the content generator.
//!
//! The trait is object-safe so a session can hold `&dyn LessonGenerator`
//! without caring which backend produced the text.

use anyhow::Result;
use async_trait::async_trait;

use super::contract::GenerationRequest;

/// A backend that drafts lesson content.
///
/// Implementors return the raw response text. Decoding and validation
/// against the lesson schema happen in [`super::request_generation`], so a
/// backend only has to deliver bytes or an error.
#[async_trait]
pub trait LessonGenerator: Send + Sync {
    /// Human-readable name for logs (e.g. "claude-code").
    fn name(&self) -> &str;

    /// Perform one generation call. No retries.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

// Compile-time assertion: LessonGenerator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn LessonGenerator) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    #[async_trait]
    impl LessonGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            Ok(request.topic.clone())
        }
    }

    #[tokio::test]
    async fn generator_is_object_safe() {
        let generator: Box<dyn LessonGenerator> = Box::new(EchoGenerator);
        assert_eq!(generator.name(), "echo");
        let request = GenerationRequest {
            topic: "Tides".to_owned(),
            grade: "6".to_owned(),
            subject: "Earth Science".to_owned(),
        };
        assert_eq!(generator.generate(&request).await.unwrap(), "Tides");
    }
}
