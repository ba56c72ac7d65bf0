// ABOUTME: AI service for text generation calls to Google Gemini
// ABOUTME: Handles API requests, response extraction, model listing, and usage reporting

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use codementor_core::truncate;

use crate::model::LanguageModel;
use crate::prompts::REVIEWER_INSTRUCTION;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum AIServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Invalid response format")]
    InvalidResponse,
}

pub type AIServiceResult<T> = Result<T, AIServiceError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// A model advertised by the Gemini API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

#[derive(Debug)]
pub struct AIResponse<T> {
    pub data: T,
    pub usage: Usage,
}

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl GeminiConfig {
    /// Read GOOGLE_GEMINI_KEY, GEMINI_MODEL and GEMINI_API_BASE from the environment
    pub fn from_env() -> Self {
        let api_key = env::var("GOOGLE_GEMINI_KEY").ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            info!("GOOGLE_GEMINI_KEY not set - AI endpoints will return errors");
        }

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        if model != DEFAULT_MODEL {
            info!("Using custom Gemini model: {}", model);
        }

        Self {
            api_key,
            model,
            api_base: env::var("GEMINI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        }
    }
}

/// AI service for making generation calls to Gemini
pub struct GeminiService {
    client: Client,
    config: GeminiConfig,
    system_instruction: Option<String>,
}

impl GeminiService {
    /// Create HTTP client with timeout configuration
    fn create_client() -> AIServiceResult<Client> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()?)
    }

    /// Creates a service using the code reviewer system instruction
    pub fn new(config: GeminiConfig) -> AIServiceResult<Self> {
        Ok(Self {
            client: Self::create_client()?,
            config,
            system_instruction: Some(REVIEWER_INSTRUCTION.to_string()),
        })
    }

    pub fn from_env() -> AIServiceResult<Self> {
        Self::new(GeminiConfig::from_env())
    }

    /// Replace the system instruction sent with every request
    pub fn with_system_instruction(mut self, instruction: Option<String>) -> Self {
        self.system_instruction = instruction;
        self
    }

    fn api_key(&self) -> AIServiceResult<&str> {
        self.config.api_key.as_deref().ok_or(AIServiceError::NoApiKey)
    }

    fn base(&self) -> &str {
        self.config.api_base.trim_end_matches('/')
    }

    /// Makes a text generation call to Gemini
    pub async fn generate_text(&self, prompt: &str) -> AIServiceResult<AIResponse<String>> {
        let api_key = self.api_key()?;

        let request = GenerateContentRequest {
            system_instruction: self.system_instruction.as_ref().map(|text| Content {
                role: None,
                parts: vec![Part { text: text.clone() }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base(),
            self.config.model
        );

        info!(
            "Making Gemini API request: model={}, prompt_chars={}",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(
                        "Gemini API request timed out after {} seconds",
                        REQUEST_TIMEOUT_SECS
                    );
                    AIServiceError::ApiError(format!(
                        "Request timed out after {} seconds",
                        REQUEST_TIMEOUT_SECS
                    ))
                } else if e.is_connect() {
                    error!("Failed to connect to Gemini API: {}", e);
                    AIServiceError::ApiError(format!("Connection failed: {}", e))
                } else {
                    error!("Gemini API request failed: {}", e);
                    AIServiceError::RequestFailed(e)
                }
            })?;

        info!("Received response from Gemini API: status={}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let error_text = truncate(&error_text, MAX_ERROR_BODY_CHARS);
            error!("Gemini API error: {} - {}", status, error_text);
            return Err(AIServiceError::ApiError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
            error!("Gemini blocked the prompt: {}", reason);
            return Err(AIServiceError::ApiError(format!("Prompt blocked: {}", reason)));
        }

        // Concatenate the text parts of the first candidate
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or(AIServiceError::InvalidResponse)?
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();

        let usage = body
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(AIResponse { data: text, usage })
    }

    /// List the models available to the configured API key
    pub async fn list_models(&self) -> AIServiceResult<Vec<ModelInfo>> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(format!("{}/v1beta/models", self.base()))
            .header("x-goog-api-key", api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let error_text = truncate(&error_text, MAX_ERROR_BODY_CHARS);
            error!("Gemini API error: {} - {}", status, error_text);
            return Err(AIServiceError::ApiError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let body: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        Ok(body.models)
    }
}

#[async_trait]
impl LanguageModel for GeminiService {
    async fn generate(&self, prompt: &str) -> AIServiceResult<AIResponse<String>> {
        self.generate_text(prompt).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
