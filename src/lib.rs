//! toolhost-mcp: a capability registry served over stdio and HTTP
//!
//! Collaborators register named tools, resources and prompts at boot. The
//! registry is then frozen and shared by two transports that dispatch into the
//! same engine:
//!
//! - **stdio**: newline-delimited JSON-RPC 2.0, one request at a time
//! - **HTTP**: one JSON request per call, served concurrently
//!
//! A given invocation produces the same result, or the same error code, on
//! either transport.
//!
//! # Modules
//!
//! - [`builtin`]: Capabilities the binary registers at boot
//! - [`capability`]: Descriptors, handlers, outcomes and the registry
//! - [`config`]: Configuration loading and validation
//! - [`engine`]: Validation and dispatch
//! - [`error`]: Error types and the shared error taxonomy
//! - [`http`]: HTTP transport
//! - [`mcp`]: JSON-RPC stdio transport
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use toolhost_mcp::capability::{
//!     Arguments, Content, InputSchema, RegistryBuilder, ToolDescriptor, ToolResult, ValueType,
//! };
//! use toolhost_mcp::engine::{Engine, InvocationRequest};
//!
//! let mut builder = RegistryBuilder::new();
//! builder
//!     .register_tool(
//!         ToolDescriptor::new(
//!             "shout",
//!             "Upper-cases its input",
//!             InputSchema::new().required("text", ValueType::String, ""),
//!         ),
//!         |args: &Arguments| -> ToolResult {
//!             let text = args["text"].as_str().unwrap_or_default();
//!             Ok(vec![Content::text(text.to_uppercase())])
//!         },
//!     )
//!     .unwrap();
//!
//! let engine = Arc::new(Engine::new(builder.build()));
//! let mut arguments = Arguments::new();
//! arguments.insert("text".into(), "hi".into());
//! assert!(engine.invoke(&InvocationRequest::tool("shout", arguments)).is_ok());
//! ```

pub mod builtin;
pub mod capability;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod mcp;
pub mod signal;
