// ABOUTME: Abstraction over the text generation backend
// ABOUTME: Lets handlers run against Gemini in production and scripted models in tests

use async_trait::async_trait;

use crate::service::{AIResponse, AIServiceResult};

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate free text for a fully constructed prompt
    async fn generate(&self, prompt: &str) -> AIServiceResult<AIResponse<String>>;

    /// Identifier of the underlying model
    fn model(&self) -> &str;
}
