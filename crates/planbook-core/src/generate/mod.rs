//! Generation gateway: request/response contract, prompt, backend trait,
//! and the Claude Code backend.

pub mod claude_code;
pub mod contract;
pub mod gateway;
pub mod prompt;
pub mod trait_def;

pub use claude_code::ClaudeCodeGenerator;
pub use contract::{
    GeneratedLesson, GenerationFailed, GenerationRequest, PartialLesson, PartialProcedure,
    parse_generated_lesson,
};
pub use gateway::request_generation;
pub use prompt::{RESPONSE_SCHEMA, build_generation_prompt};
pub use trait_def::LessonGenerator;
