// ABOUTME: Integration tests for history endpoints
// ABOUTME: Add, list and positional delete through the HTTP API

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{send, setup, signup, ScriptedModel};

#[tokio::test]
async fn test_history_round_trip() {
    let (app, _) = setup(ScriptedModel::replying("")).await;
    let token = signup(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/history/add",
        Some(&token),
        Some(json!({"codeSnippet": "let x = 1;", "issues": ["unused"], "suggestions": ["remove"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "review");
    assert_eq!(body["data"]["codeSnippet"], "let x = 1;");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/history",
        Some(&token),
        Some(json!({
            "type": "codegen",
            "query": "fizzbuzz",
            "language": "python",
            "generatedCode": "print(1)",
            "explanation": "prints"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/api/history", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["type"], "review");
    assert_eq!(entries[1]["type"], "codegen");
    assert_eq!(entries[1]["generatedCode"], "print(1)");

    let (status, body) = send(&app, Method::DELETE, "/api/history/0", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let remaining = body["data"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["query"], "fizzbuzz");
}

#[tokio::test]
async fn test_delete_invalid_index() {
    let (app, _) = setup(ScriptedModel::replying("")).await;
    let token = signup(&app, "ada@example.com").await;

    let (status, body) = send(&app, Method::DELETE, "/api/history/0", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid history index.");

    let (status, _) = send(&app, Method::DELETE, "/api/history/-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, "/api/history/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_index_beyond_i64_keeps_entries() {
    let (app, _) = setup(ScriptedModel::replying("")).await;
    let token = signup(&app, "ada@example.com").await;

    for snippet in ["zero", "one"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/history/add",
            Some(&token),
            Some(json!({"codeSnippet": snippet})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/history/18446744073709551615",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid history index.");

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/history/9223372036854775808",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/api/history", Some(&token), None).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["codeSnippet"], "zero");
    assert_eq!(entries[1]["codeSnippet"], "one");
}

#[tokio::test]
async fn test_history_is_per_user() {
    let (app, _) = setup(ScriptedModel::replying("")).await;
    let ada = signup(&app, "ada@example.com").await;
    let grace = signup(&app, "grace@example.com").await;

    send(
        &app,
        Method::POST,
        "/api/history/add",
        Some(&ada),
        Some(json!({"codeSnippet": "x"})),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/api/history", Some(&grace), None).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(&app, Method::DELETE, "/api/history/0", Some(&grace), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/api/auth/profile", Some(&ada), None).await;
    assert_eq!(body["data"]["history"].as_array().unwrap().len(), 1);
}
