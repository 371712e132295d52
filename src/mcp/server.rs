//! JSON-RPC server loop over a byte-stream transport.
//!
//! Frames are handled strictly one at a time: read, dispatch to the engine,
//! write the reply, then read the next frame. Output can never interleave, and
//! a client that pipelines requests still gets every answer tagged with the
//! `id` it sent.
//!
//! A bad frame produces an error reply and the loop carries on. The loop ends
//! cleanly when the input stream closes, or on SIGINT/SIGTERM when started
//! with [`McpServer::run`].

use std::io;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::io::{AsyncRead, AsyncWrite, Stdin, Stdout};
use tracing::{debug, error, info, warn};

use crate::capability::CapabilityKind;
use crate::engine::{
    decode_params, Engine, InvocationRequest, PromptGetParams, ResourceReadParams, ToolCallParams,
};
use crate::error::InvocationError;
use crate::mcp::protocol::{
    parse_message, IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse,
};
use crate::mcp::transport::StdioTransport;
use crate::signal::shutdown_signal;

/// What a request method resolves to.
enum Route {
    Initialize,
    Ping,
    List(CapabilityKind),
    Invoke(InvocationRequest),
}

/// Maps a method name and its params onto a route.
///
/// Returns `Ok(None)` for methods this server does not implement.
fn route(method: &str, params: Value) -> Result<Option<Route>, InvocationError> {
    let route = match method {
        "initialize" => Route::Initialize,
        "ping" => Route::Ping,
        "tools/list" => Route::List(CapabilityKind::Tool),
        "resources/list" => Route::List(CapabilityKind::Resource),
        "prompts/list" => Route::List(CapabilityKind::Prompt),
        "tools/call" => Route::Invoke(decode_params::<ToolCallParams>(params)?),
        "resources/read" => Route::Invoke(decode_params::<ResourceReadParams>(params)?),
        "prompts/get" => Route::Invoke(decode_params::<PromptGetParams>(params)?),
        _ => return Ok(None),
    };
    Ok(Some(route))
}

/// Dispatches one request against the engine.
///
/// # Errors
///
/// Returns the JSON-RPC error to send back when the method is unknown or the
/// invocation fails.
pub fn dispatch(engine: &Engine, request: JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
    let JsonRpcRequest { id, method, params } = request;

    let route = match route(&method, params) {
        Ok(Some(route)) => route,
        Ok(None) => return Err(JsonRpcError::method_not_found(id, &method)),
        Err(e) => return Err(JsonRpcError::from_invocation(id, &e)),
    };

    let result = match route {
        Route::Initialize => serde_json::to_value(engine.initialize()),
        Route::Ping => Ok(json!({})),
        Route::List(kind) => serde_json::to_value(engine.list(kind)).map(|listing| {
            let mut envelope = Map::new();
            envelope.insert(kind.plural().to_string(), listing);
            Value::Object(envelope)
        }),
        Route::Invoke(request) => match engine.invoke(&request) {
            Ok(outcome) => serde_json::to_value(outcome),
            Err(e) => return Err(JsonRpcError::from_invocation(id, &e)),
        },
    };

    match result {
        Ok(value) => Ok(JsonRpcResponse::success(id, value)),
        Err(e) => {
            error!(error = %e, method = %method, "failed to serialise result");
            Err(JsonRpcError::internal_error(
                id,
                "Internal error: failed to serialise result",
            ))
        }
    }
}

/// Handles a notification: the invocation runs, but nothing is written back.
///
/// Lifecycle notifications such as `notifications/initialized` need no work.
pub fn notify(engine: &Engine, notification: JsonRpcNotification) {
    let JsonRpcNotification { method, params } = notification;

    match route(&method, params) {
        Ok(Some(Route::Invoke(request))) => {
            if let Err(e) = engine.invoke(&request) {
                debug!(method = %method, code = %e.code(), error = %e, "notification invocation failed");
            }
        }
        Ok(Some(_)) => {}
        Ok(None) => debug!(method = %method, "ignoring notification"),
        Err(e) => debug!(method = %method, error = %e, "notification rejected"),
    }
}

/// JSON-RPC server bound to one transport.
pub struct McpServer<R = Stdin, W = Stdout> {
    /// The transport layer.
    transport: StdioTransport<R, W>,
    /// Shared dispatch engine.
    engine: Arc<Engine>,
}

impl McpServer {
    /// Creates a server on the process's stdin and stdout.
    #[must_use]
    pub fn stdio(engine: Arc<Engine>) -> Self {
        Self::new(StdioTransport::stdio(), engine)
    }
}

impl<R, W> McpServer<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a server over `transport`.
    pub const fn new(transport: StdioTransport<R, W>, engine: Arc<Engine>) -> Self {
        Self { transport, engine }
    }

    /// Runs the loop until EOF or a shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails or signal handlers cannot be
    /// installed.
    pub async fn run(&mut self) -> io::Result<()> {
        tokio::select! {
            result = self.serve() => result,
            signal = shutdown_signal() => {
                let name = signal?;
                info!(signal = name, "Received shutdown signal, stopping stdio loop");
                Ok(())
            }
        }
    }

    /// Runs the loop until the input stream closes.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve(&mut self) -> io::Result<()> {
        info!("Serving JSON-RPC on stdio");

        while let Some(line) = self.transport.read_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            self.handle_line(&line).await?;
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handles a single frame.
    async fn handle_line(&mut self, line: &str) -> io::Result<()> {
        match parse_message(line) {
            Ok(IncomingMessage::Request(request)) => {
                debug!(id = %request.id, method = %request.method, "received request");
                match dispatch(&self.engine, request) {
                    Ok(response) => self.transport.write_response(&response).await,
                    Err(error) => self.transport.write_error(&error).await,
                }
            }
            Ok(IncomingMessage::Notification(notification)) => {
                debug!(method = %notification.method, "received notification");
                notify(&self.engine, notification);
                Ok(())
            }
            Err(error) => {
                warn!(code = error.error.code, message = %error.error.message, "rejected frame");
                self.transport.write_error(&error).await
            }
        }
    }

    /// Consumes the server, returning its transport.
    pub fn into_transport(self) -> StdioTransport<R, W> {
        self.transport
    }
}
