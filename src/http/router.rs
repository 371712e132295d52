//! Axum router for the HTTP transport.
//!
//! | Method | Path              | Body                | Response               |
//! |--------|-------------------|---------------------|------------------------|
//! | POST   | `/initialize`     | `{}`                | initialise advertisement |
//! | GET    | `/tools/list`     | none                | array of tool descriptors |
//! | GET    | `/resources/list` | none                | array of resource descriptors |
//! | GET    | `/prompts/list`   | none                | array of prompt descriptors |
//! | POST   | `/tools/call`     | `{name, arguments}` | tool outcome           |
//! | POST   | `/resources/read` | `{uri}`             | resource outcome       |
//! | POST   | `/prompts/get`    | `{name, arguments}` | prompt outcome         |
//! | GET    | `/health`         | none                | liveness only          |
//!
//! Every request is independent. POST bodies must be `application/json` and
//! at most 2 MB. Every error, including an unknown route, a wrong method and
//! an oversized body, uses the `{"error": {"code", "message"}}` body.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::capability::{CapabilityKind, Outcome};
use crate::engine::{
    decode_params, Engine, InitializeResult, PromptGetParams, ResourceReadParams, ToolCallParams,
    WireParams,
};
use crate::error::{ErrorCode, InvocationError};
use crate::http::error::ApiError;

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The dispatch engine.
    pub engine: Arc<Engine>,
}

/// Builds the axum `Router` with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/initialize", post(handle_initialize))
        .route("/tools/list", get(handle_tools_list))
        .route("/resources/list", get(handle_resources_list))
        .route("/prompts/list", get(handle_prompts_list))
        .route("/tools/call", post(handle_invoke::<ToolCallParams>))
        .route("/resources/read", post(handle_invoke::<ResourceReadParams>))
        .route("/prompts/get", post(handle_invoke::<PromptGetParams>))
        .route("/health", get(handle_health))
        .method_not_allowed_fallback(handle_method_not_allowed)
        .fallback(handle_fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check. Never touches the registry.
async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn handle_initialize(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<InitializeResult>, ApiError> {
    json_body(&headers, &read_body(body)?)?;
    Ok(Json(state.engine.initialize()))
}

async fn handle_tools_list(State(state): State<AppState>) -> Response {
    Json(state.engine.list(CapabilityKind::Tool)).into_response()
}

async fn handle_resources_list(State(state): State<AppState>) -> Response {
    Json(state.engine.list(CapabilityKind::Resource)).into_response()
}

async fn handle_prompts_list(State(state): State<AppState>) -> Response {
    Json(state.engine.list(CapabilityKind::Prompt)).into_response()
}

/// Decodes the body as `P` and invokes the engine.
///
/// Handlers may block, so the invocation runs on the blocking pool and only
/// ties up this one request.
async fn handle_invoke<P: WireParams>(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Outcome>, ApiError> {
    let params = json_body(&headers, &read_body(body)?)?;
    let request = decode_params::<P>(params)?;
    debug!(kind = %P::KIND, name = %request.name, "HTTP invocation");

    let engine = Arc::clone(&state.engine);
    let outcome = tokio::task::spawn_blocking(move || engine.invoke(&request))
        .await
        .map_err(|e| ApiError::new(ErrorCode::HandlerError, format!("handler aborted: {e}")))??;

    Ok(Json(outcome))
}

async fn handle_fallback(uri: Uri) -> ApiError {
    ApiError::new(ErrorCode::NotFound, format!("no route for {}", uri.path()))
}

// axum still attaches the `Allow` header to this response.
async fn handle_method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        ErrorCode::NotFound,
        format!("no {method} route for {}", uri.path()),
    )
    .with_status(StatusCode::METHOD_NOT_ALLOWED)
}

/// Turns a body rejection (oversized or unreadable) into an API error with
/// the rejection's status.
fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        ApiError::new(ErrorCode::InvalidArguments, rejection.body_text())
            .with_status(rejection.status())
    })
}

/// Checks the content type and parses the body.
///
/// An empty body is read as `{}`.
fn json_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let is_json = content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"));

    if !is_json {
        return Err(InvocationError::InvalidArguments {
            field: "Content-Type".to_string(),
            expected: "application/json".to_string(),
            actual: content_type.unwrap_or("missing").to_string(),
        }
        .into());
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::new(ErrorCode::ParseError, format!("Parse error: {e}")))
}
