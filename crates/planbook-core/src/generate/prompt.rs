//! Prompt construction for lesson generation. Pure functions, no I/O.

use super::contract::GenerationRequest;

/// JSON Schema of the expected response, included verbatim in the prompt.
pub const RESPONSE_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "title": { "type": "string" },
    "duration": { "type": "string" },
    "objectives": { "type": "string" },
    "standards": { "type": "string" },
    "materials": { "type": "array", "items": { "type": "string" } },
    "procedure": {
      "type": "object",
      "properties": {
        "anticipatorySet": { "type": "string" },
        "directInstruction": { "type": "string" },
        "guidedPractice": { "type": "string" },
        "independentPractice": { "type": "string" },
        "closure": { "type": "string" }
      },
      "required": ["anticipatorySet", "directInstruction", "guidedPractice", "independentPractice", "closure"]
    },
    "assessment": { "type": "string" },
    "differentiation": { "type": "string" }
  },
  "required": ["title", "duration", "objectives", "standards", "materials", "procedure", "assessment", "differentiation"]
}"#;

/// Build the full prompt for one generation request.
pub fn build_generation_prompt(request: &GenerationRequest) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(&format!(
        "Create a detailed lesson plan for the following topic: {}.\n",
        request.topic
    ));
    prompt.push_str(&format!(
        "The target students are in grade {} for the subject {}.\n\n",
        request.grade, request.subject
    ));

    prompt.push_str(
        "Respond with a single JSON object and nothing else: no prose, \
         no explanation. The object must match this JSON Schema, and every \
         required field must be present:\n\n",
    );
    prompt.push_str(RESPONSE_SCHEMA);
    prompt.push('\n');

    prompt
}
