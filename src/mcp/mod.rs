//! JSON-RPC 2.0 transport over a pair of byte streams.
//!
//! This is the transport a parent process uses when it spawns the server as a
//! child: requests arrive on stdin, responses leave on stdout, one JSON object
//! per line.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        McpServer                           │
//! │                                                            │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐   │
//! │   │  Transport  │───▶│  protocol   │───▶│   Engine    │   │
//! │   │ (line I/O)  │    │ (JSON-RPC)  │    │  (shared)   │   │
//! │   └─────────────┘    └─────────────┘    └─────────────┘   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Methods
//!
//! `initialize`, `ping`, `tools/list`, `tools/call`, `resources/list`,
//! `resources/read`, `prompts/list`, `prompts/get`.
//!
//! # Protocol Version
//!
//! This implementation advertises MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::{dispatch, notify, McpServer};
pub use transport::StdioTransport;
