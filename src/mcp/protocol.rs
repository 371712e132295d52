//! JSON-RPC 2.0 message types for the stdio transport.
//!
//! # Message Types
//!
//! - **Request**: has an `id`, always answered with a response or an error
//! - **Notification**: no `id`, never answered
//! - **Response**: `{jsonrpc, id, result}`
//! - **Error**: `{jsonrpc, id, error: {code, message, data}}`
//!
//! Request IDs are strings or integers and are echoed back unchanged, which is
//! what lets a client that pipelines several requests pair up the answers.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{ErrorCode as Taxonomy, InvocationError};

/// The MCP protocol version this implementation advertises.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Default server name advertised on initialise.
pub const SERVER_NAME: &str = "toolhost-mcp";

/// A JSON-RPC 2.0 request ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(i64),
    /// String request ID.
    String(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone)]
pub struct JsonRpcRequest {
    /// Request identifier, echoed in the reply.
    pub id: RequestId,
    /// The method to invoke.
    pub method: String,
    /// Parameters; `Value::Null` when the frame had none.
    pub params: Value,
}

/// A JSON-RPC 2.0 notification (no reply expected).
#[derive(Debug, Clone)]
pub struct JsonRpcNotification {
    /// The notification method.
    pub method: String,
    /// Parameters; `Value::Null` when the frame had none.
    pub params: Value,
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to.
    pub id: RequestId,

    /// The result of the method call.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result,
        }
    }
}

/// Standard JSON-RPC 2.0 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// The JSON sent is not a valid Request object.
    InvalidRequest,
    /// The method does not exist or is not available.
    MethodNotFound,
    /// Invalid method parameters.
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,

    /// Additional information about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorData {
    /// Creates a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    /// Creates an error from the shared taxonomy.
    ///
    /// `data.code` carries the taxonomy name so stdio clients can see the
    /// same classification HTTP clients get.
    #[must_use]
    pub fn from_taxonomy(code: Taxonomy, message: impl Into<String>) -> Self {
        Self {
            code: code.jsonrpc_code(),
            message: message.into(),
            data: Some(json!({ "code": code.as_str() })),
        }
    }
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this error corresponds to; `null` when it could not be
    /// read from the frame.
    pub id: Option<RequestId>,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates a new error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            error,
        }
    }

    /// Creates a parse error response (ID cannot be determined).
    #[must_use]
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(
            None,
            JsonRpcErrorData::from_taxonomy(
                Taxonomy::ParseError,
                format!("{}: {detail}", ErrorCode::ParseError.default_message()),
            ),
        )
    }

    /// Creates an invalid request error response.
    #[must_use]
    pub fn invalid_request(id: Option<RequestId>, reason: &str) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(
                ErrorCode::InvalidRequest,
                format!("{}: {reason}", ErrorCode::InvalidRequest.default_message()),
            ),
        )
    }

    /// Creates a method not found error response.
    #[must_use]
    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(
                ErrorCode::MethodNotFound,
                format!("{}: {method}", ErrorCode::MethodNotFound.default_message()),
            ),
        )
    }

    /// Creates an internal error response.
    #[must_use]
    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(ErrorCode::InternalError, message),
        )
    }

    /// Maps an engine error onto a JSON-RPC error for request `id`.
    #[must_use]
    pub fn from_invocation(id: RequestId, error: &InvocationError) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::from_taxonomy(error.code(), error.to_string()),
        )
    }
}

/// An incoming message that could be either a request or notification.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// A request expecting a response.
    Request(JsonRpcRequest),
    /// A notification (no response expected).
    Notification(JsonRpcNotification),
}

impl IncomingMessage {
    /// Returns the method name of this message.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Request(req) => &req.method,
            Self::Notification(notif) => &notif.method,
        }
    }

    /// Returns the request ID if this is a request.
    #[must_use]
    pub const fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Request(req) => Some(&req.id),
            Self::Notification(_) => None,
        }
    }
}

/// Parses one frame into an incoming message.
///
/// - Malformed JSON is a parse error (`-32700`) with no ID.
/// - A non-object frame or a wrong `jsonrpc` version is an invalid request
///   (`-32600`).
/// - A request with a missing or non-string `method` is reported as method
///   not found (`-32601`) against its ID.
///
/// # Errors
///
/// Returns the `JsonRpcError` to send back for a frame that is not a valid
/// message.
pub fn parse_message(json: &str) -> Result<IncomingMessage, JsonRpcError> {
    let value: Value = serde_json::from_str(json).map_err(JsonRpcError::parse_error)?;

    let Value::Object(mut obj) = value else {
        return Err(JsonRpcError::invalid_request(None, "message must be an object"));
    };

    let id = match obj.remove("id") {
        None => None,
        Some(raw) => Some(
            serde_json::from_value::<RequestId>(raw).map_err(|_| {
                JsonRpcError::invalid_request(None, "id must be a string or an integer")
            })?,
        ),
    };

    if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Err(JsonRpcError::invalid_request(
            id,
            "jsonrpc field must be \"2.0\"",
        ));
    }

    let method = match obj.remove("method") {
        Some(Value::String(method)) if !method.is_empty() => method,
        _ => {
            return Err(match id {
                Some(id) => JsonRpcError::method_not_found(id, "<missing>"),
                None => JsonRpcError::invalid_request(None, "method field is required"),
            });
        }
    };

    match id {
        Some(id) => Ok(IncomingMessage::Request(JsonRpcRequest {
            id,
            method,
            params: take_params(&mut obj),
        })),
        None => Ok(IncomingMessage::Notification(JsonRpcNotification {
            method,
            params: take_params(&mut obj),
        })),
    }
}

fn take_params(obj: &mut Map<String, Value>) -> Value {
    obj.remove("params").unwrap_or(Value::Null)
}
