//! LlmClient against an in-process stub of the inference APIs.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use jurisflow::llm::{
    AnalysisClient, AnalysisRequest, LlmClient, LlmConfig, LlmError, LlmProvider,
    DEFAULT_SYSTEM_ROLE,
};
use jurisflow::Topic;
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Captured {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<String>>>,
}

async fn chat_completions(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        captured.auth.lock().unwrap().push(auth.to_string());
    }
    captured.bodies.lock().unwrap().push(body.clone());

    if body["model"] == "modelo-inexistente" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "message": "The model does not exist" } })),
        );
    }
    if body["model"] == "modelo-mudo" {
        return (
            StatusCode::OK,
            Json(json!({ "choices": [{ "message": { "role": "assistant", "content": "  \n " } }] })),
        );
    }
    let reply = format!("  Parecer: {}  ", body["messages"][1]["content"].as_str().unwrap_or(""));
    (
        StatusCode::OK,
        Json(json!({ "choices": [{ "message": { "role": "assistant", "content": reply } }] })),
    )
}

async fn ollama_generate(
    State(captured): State<Captured>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    captured.bodies.lock().unwrap().push(body.clone());
    if body["model"] == "ausente" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "model not found" })));
    }
    (StatusCode::OK, Json(json!({ "response": "análise local", "done": true })))
}

async fn spawn_stub() -> (SocketAddr, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/api/generate", post(ollama_generate))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, captured)
}

fn openai_config(addr: SocketAddr) -> LlmConfig {
    LlmConfig {
        api_key: Some("sk-teste".to_string()),
        ..LlmConfig::default()
    }
    .with_endpoint(&format!("http://{addr}/"))
}

#[tokio::test]
async fn openai_request_shape_and_reply() {
    let (addr, captured) = spawn_stub().await;
    let client = LlmClient::new(openai_config(addr)).unwrap();

    let request = AnalysisRequest::new(Topic::Facts, "O réu foi preso em flagrante.");
    let reply = client.analyze(&request).await.unwrap();

    assert!(reply.starts_with("Parecer: "));
    assert!(reply.contains("Fatos"));
    assert!(reply.contains("O réu foi preso em flagrante."));
    assert_eq!(reply, reply.trim());

    let bodies = captured.bodies.lock().unwrap();
    let body = &bodies[0];
    assert_eq!(body["model"], "gpt-3.5-turbo");
    assert_eq!(body["max_tokens"], 1500);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], DEFAULT_SYSTEM_ROLE);
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(captured.auth.lock().unwrap()[0], "Bearer sk-teste");
}

#[tokio::test]
async fn blank_reply_is_an_empty_analysis() {
    let (addr, _) = spawn_stub().await;
    let client = LlmClient::new(openai_config(addr).with_model("modelo-mudo")).unwrap();

    let reply = client
        .analyze(&AnalysisRequest::new(Topic::Facts, "furto simples"))
        .await
        .unwrap();
    assert_eq!(reply, "");
}

#[tokio::test]
async fn request_system_role_overrides_config() {
    let (addr, captured) = spawn_stub().await;
    let client = LlmClient::new(openai_config(addr)).unwrap();

    let request =
        AnalysisRequest::new(Topic::CaseLaw, "HC 123.456/SP").with_system_role("Você é um juiz.");
    client.analyze(&request).await.unwrap();

    let bodies = captured.bodies.lock().unwrap();
    assert_eq!(bodies[0]["messages"][0]["content"], "Você é um juiz.");
}

#[tokio::test]
async fn openai_error_body_is_surfaced() {
    let (addr, _) = spawn_stub().await;
    let client = LlmClient::new(openai_config(addr).with_model("modelo-inexistente")).unwrap();

    let err = client
        .analyze(&AnalysisRequest::new(Topic::Evidence, "laudo pericial"))
        .await
        .unwrap_err();

    match err {
        LlmError::Api(detail) => {
            assert!(detail.contains("404"), "{detail}");
            assert!(detail.contains("The model does not exist"), "{detail}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn ollama_generate_request_shape() {
    let (addr, captured) = spawn_stub().await;
    let config = LlmConfig {
        provider: LlmProvider::Ollama,
        ..LlmConfig::default()
    }
    .with_endpoint(&format!("http://{addr}"))
    .with_model("llama3.2");
    let client = LlmClient::new(config).unwrap();

    let reply = client
        .analyze(&AnalysisRequest::new(Topic::DefenseArguments, "legítima defesa"))
        .await
        .unwrap();
    assert_eq!(reply, "análise local");

    let bodies = captured.bodies.lock().unwrap();
    assert_eq!(bodies[0]["model"], "llama3.2");
    assert_eq!(bodies[0]["stream"], false);
    assert_eq!(bodies[0]["system"], DEFAULT_SYSTEM_ROLE);
    assert_eq!(bodies[0]["options"]["num_predict"], 1500);
}

#[tokio::test]
async fn ollama_missing_model() {
    let (addr, _) = spawn_stub().await;
    let config = LlmConfig {
        provider: LlmProvider::Ollama,
        ..LlmConfig::default()
    }
    .with_endpoint(&format!("http://{addr}"))
    .with_model("ausente");
    let client = LlmClient::new(config).unwrap();

    let err = client.complete("sistema", "pergunta").await.unwrap_err();
    assert!(matches!(err, LlmError::ModelNotFound(ref m) if m == "ausente"));
}

#[tokio::test]
async fn unreachable_endpoint_is_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = LlmClient::new(openai_config(addr)).unwrap();
    let err = client.complete("sistema", "pergunta").await.unwrap_err();
    assert!(matches!(err, LlmError::Connection(_)));
}
