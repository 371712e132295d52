//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use toolhost_mcp::builtin;
use toolhost_mcp::capability::{
    Arguments, InputSchema, RegistryBuilder, ToolDescriptor, ToolResult,
};
use toolhost_mcp::engine::Engine;
use toolhost_mcp::http::{build_router, AppState};
use toolhost_mcp::mcp::{McpServer, StdioTransport};

/// Builtins plus a tool that always fails.
pub fn engine() -> Arc<Engine> {
    let mut builder = RegistryBuilder::new();
    builtin::register(&mut builder).unwrap();
    builder
        .register_tool(
            ToolDescriptor::new("fail", "Always fails", InputSchema::new()),
            |_: &Arguments| -> ToolResult { Err("deliberate failure".to_string()) },
        )
        .unwrap();
    Arc::new(Engine::new(builder.build()))
}

/// Feeds `input` to a stdio server and returns every frame it wrote.
pub async fn stdio_frames(engine: Arc<Engine>, input: &str) -> Vec<Value> {
    let mut server = McpServer::new(StdioTransport::new(input.as_bytes(), Vec::new()), engine);
    server.serve().await.unwrap();

    let output = String::from_utf8(server.into_transport().into_writer()).unwrap();
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Sends one JSON-RPC request over stdio and returns the single reply.
pub async fn stdio_call(engine: Arc<Engine>, method: &str, params: &Value) -> Value {
    let frame = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });
    let mut frames = stdio_frames(engine, &format!("{frame}\n")).await;
    assert_eq!(frames.len(), 1, "expected exactly one reply");
    frames.remove(0)
}

/// Sends a prepared request through the router.
pub async fn http_send(engine: Arc<Engine>, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(AppState { engine })
        .oneshot(request)
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// GETs `path`.
pub async fn http_get(engine: Arc<Engine>, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    http_send(engine, request).await
}

/// POSTs `body` as JSON to `path`.
pub async fn http_post(engine: Arc<Engine>, path: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    http_send(engine, request).await
}
