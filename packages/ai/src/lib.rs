// ABOUTME: Language model integration for Codementor
// ABOUTME: Gemini client, prompt builders, and best-effort response parsers

pub mod model;
pub mod parsing;
pub mod prompts;
pub mod service;

// Re-export service types
pub use model::LanguageModel;
pub use service::{
    AIResponse, AIServiceError, AIServiceResult, GeminiConfig, GeminiService, ModelInfo, Usage,
};

// Re-export parsing and prompt helpers
pub use parsing::{parse_generated_code, parse_review, parse_roadmap, GeneratedCode, ReviewResult};
pub use prompts::{codegen_prompt, review_prompt, roadmap_prompt, REVIEWER_INSTRUCTION};
