//! The invocation engine.
//!
//! Both transports decode their wire messages into an [`InvocationRequest`]
//! and hand it to [`Engine::invoke`]. The engine resolves the capability,
//! validates arguments, runs the handler and shapes the result. Transports
//! only ever re-encode what comes back, so a given call behaves the same on
//! HTTP and stdio.
//!
//! ```text
//!  HTTP body ─┐                          ┌─▶ HTTP response
//!             ├─▶ InvocationRequest ─▶ Engine ─▶ Outcome / InvocationError
//!  stdio frame┘                          └─▶ JSON-RPC result / error
//! ```
//!
//! The engine never retries. A handler failure is logged and returned as
//! [`InvocationError::HandlerError`] with the handler's message unchanged.

mod params;

pub use params::{decode_params, PromptGetParams, ResourceReadParams, ToolCallParams, WireParams};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::capability::schema::type_name;
use crate::capability::{
    Arguments, CapabilityKind, Outcome, PromptArguments, PromptDescriptor, PromptOutcome,
    Registry, ResourceContents, ResourceDescriptor, ResourceOutcome, ToolDescriptor, ToolOutcome,
};
use crate::error::InvocationError;
use crate::mcp::protocol::{MCP_PROTOCOL_VERSION, SERVER_NAME};

/// A transport-neutral request to invoke one capability.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    /// Which partition to look in.
    pub kind: CapabilityKind,
    /// Capability name; the URI for resources.
    pub name: String,
    /// Caller-supplied arguments (ignored for resources).
    pub arguments: Arguments,
}

impl InvocationRequest {
    /// Creates a tool call request.
    #[must_use]
    pub fn tool(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            kind: CapabilityKind::Tool,
            name: name.into(),
            arguments,
        }
    }

    /// Creates a resource read request.
    #[must_use]
    pub fn resource(uri: impl Into<String>) -> Self {
        Self {
            kind: CapabilityKind::Resource,
            name: uri.into(),
            arguments: Arguments::new(),
        }
    }

    /// Creates a prompt get request.
    #[must_use]
    pub fn prompt(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            kind: CapabilityKind::Prompt,
            name: name.into(),
            arguments,
        }
    }
}

/// Server information advertised on initialise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl ServerInfo {
    /// Creates server information with the crate version.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::named(SERVER_NAME)
    }
}

/// Number of capabilities of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindCount {
    /// How many are registered.
    pub count: usize,
}

/// Per-kind capability counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityCounts {
    /// Tool count.
    pub tools: KindCount,
    /// Resource count.
    pub resources: KindCount,
    /// Prompt count.
    pub prompts: KindCount,
}

/// The initialise advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol version this server speaks.
    pub protocol_version: String,
    /// Name and version of the server.
    pub server_info: ServerInfo,
    /// What the server exposes.
    pub capabilities: CapabilityCounts,
}

/// Descriptors of one kind, in registration order.
///
/// Serialises as a plain JSON array.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing<'a> {
    /// Tool descriptors.
    Tools(Vec<&'a ToolDescriptor>),
    /// Resource descriptors.
    Resources(Vec<&'a ResourceDescriptor>),
    /// Prompt descriptors.
    Prompts(Vec<&'a PromptDescriptor>),
}

impl Listing<'_> {
    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Tools(v) => v.len(),
            Self::Resources(v) => v.len(),
            Self::Prompts(v) => v.len(),
        }
    }

    /// Returns `true` if nothing of this kind is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dispatches invocations against a frozen [`Registry`].
#[derive(Debug)]
pub struct Engine {
    registry: Registry,
    server_info: ServerInfo,
}

impl Engine {
    /// Creates an engine with the default server information.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self::with_server_info(registry, ServerInfo::default())
    }

    /// Creates an engine that advertises `server_info`.
    #[must_use]
    pub const fn with_server_info(registry: Registry, server_info: ServerInfo) -> Self {
        Self {
            registry,
            server_info,
        }
    }

    /// The registry this engine dispatches against.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The advertised server information.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Builds the initialise advertisement.
    ///
    /// Initialisation carries no session state; any number of clients may
    /// call this at any time.
    #[must_use]
    pub fn initialize(&self) -> InitializeResult {
        let count = |kind| KindCount {
            count: self.registry.count(kind),
        };
        InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            server_info: self.server_info.clone(),
            capabilities: CapabilityCounts {
                tools: count(CapabilityKind::Tool),
                resources: count(CapabilityKind::Resource),
                prompts: count(CapabilityKind::Prompt),
            },
        }
    }

    /// Lists the descriptors of `kind` in registration order.
    #[must_use]
    pub fn list(&self, kind: CapabilityKind) -> Listing<'_> {
        match kind {
            CapabilityKind::Tool => Listing::Tools(self.registry.tools().collect()),
            CapabilityKind::Resource => Listing::Resources(self.registry.resources().collect()),
            CapabilityKind::Prompt => Listing::Prompts(self.registry.prompts().collect()),
        }
    }

    /// Invokes one capability.
    ///
    /// # Errors
    ///
    /// - [`InvocationError::UnknownCapability`] if nothing is registered
    ///   under the requested kind and name
    /// - [`InvocationError::InvalidArguments`] if the arguments do not match
    ///   the descriptor
    /// - [`InvocationError::HandlerError`] if the handler fails
    pub fn invoke(&self, request: &InvocationRequest) -> Result<Outcome, InvocationError> {
        debug!(kind = %request.kind, name = %request.name, "invoking capability");

        let result = match request.kind {
            CapabilityKind::Tool => self
                .call_tool(&request.name, &request.arguments)
                .map(Outcome::Tool),
            CapabilityKind::Resource => self.read_resource(&request.name).map(Outcome::Resource),
            CapabilityKind::Prompt => self
                .get_prompt(&request.name, &request.arguments)
                .map(Outcome::Prompt),
        };

        if let Err(ref error) = result {
            match error {
                InvocationError::HandlerError { message } => {
                    warn!(kind = %request.kind, name = %request.name, error = %message, "handler failed");
                }
                other => {
                    debug!(kind = %request.kind, name = %request.name, error = %other, "invocation rejected");
                }
            }
        }

        result
    }

    fn call_tool(&self, name: &str, arguments: &Arguments) -> Result<ToolOutcome, InvocationError> {
        let (descriptor, handler) = self.registry.tool(name)?;
        descriptor.input_schema.validate(arguments)?;

        let content = run_handler(name, || handler.call(arguments))?;
        Ok(ToolOutcome::new(content))
    }

    fn read_resource(&self, uri: &str) -> Result<ResourceOutcome, InvocationError> {
        let (descriptor, reader) = self.registry.resource(uri)?;

        let content = run_handler(uri, || reader.read(uri))?;
        Ok(ResourceOutcome {
            contents: vec![ResourceContents {
                uri: descriptor.uri.clone(),
                mime_type: descriptor.mime_type.clone(),
                content,
            }],
        })
    }

    fn get_prompt(&self, name: &str, arguments: &Arguments) -> Result<PromptOutcome, InvocationError> {
        let (descriptor, builder) = self.registry.prompt(name)?;
        let arguments = prompt_arguments(descriptor, arguments)?;

        let messages = run_handler(name, || builder.build(&arguments))?;
        Ok(PromptOutcome {
            description: descriptor.description.clone(),
            messages,
        })
    }
}

#[allow(clippy::needless_pass_by_value)] // used as a map_err adaptor
fn handler_error(message: String) -> InvocationError {
    InvocationError::HandlerError { message }
}

/// Runs one handler call. A panic is reported as a `HandlerError`.
///
/// Only effective where panics unwind; the release profile aborts.
fn run_handler<T>(
    name: &str,
    call: impl FnOnce() -> Result<T, String>,
) -> Result<T, InvocationError> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result.map_err(handler_error),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(capability = name, panic = %message, "handler panicked");
            Err(handler_error(format!("handler panicked: {message}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Resolves prompt arguments against the descriptor.
///
/// Every declared argument ends up in the map; missing optional ones are
/// empty strings. Undeclared keys are dropped.
fn prompt_arguments(
    descriptor: &PromptDescriptor,
    arguments: &Arguments,
) -> Result<PromptArguments, InvocationError> {
    let mut resolved = PromptArguments::with_capacity(descriptor.arguments.len());

    for argument in &descriptor.arguments {
        let value = match arguments.get(&argument.name) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(InvocationError::InvalidArguments {
                    field: argument.name.clone(),
                    expected: "string".to_string(),
                    actual: type_name(other).to_string(),
                });
            }
            None if argument.required => {
                return Err(InvocationError::missing(&argument.name, "string"));
            }
            None => String::new(),
        };
        resolved.insert(argument.name.clone(), value);
    }

    Ok(resolved)
}
