// ABOUTME: Shared helpers for API integration tests
// ABOUTME: Scripted language model, in-memory app setup, and request helpers

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use codementor_ai::{AIResponse, AIServiceError, AIServiceResult, LanguageModel, Usage};
use codementor_api::{create_router, AppState};
use codementor_storage::init_memory_pool;

/// Language model that replays a fixed reply and records prompts
pub struct ScriptedModel {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A model whose every call fails like an unreachable upstream
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> AIServiceResult<AIResponse<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(reply) => Ok(AIResponse {
                data: reply.clone(),
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            }),
            None => Err(AIServiceError::ApiError("API returned 503".to_string())),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

pub async fn setup(model: ScriptedModel) -> (Router, Arc<ScriptedModel>) {
    let pool = init_memory_pool().await.unwrap();
    let model = Arc::new(model);
    let state = AppState::new(pool, model.clone());
    (create_router(state), model)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));

    (status, value)
}

/// Register and log in, returning the bearer token
pub async fn signup(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "username": "Ada",
            "email": email,
            "password": "analytical-engine",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(serde_json::json!({"email": email, "password": "analytical-engine"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["data"]["token"].as_str().unwrap().to_string()
}
