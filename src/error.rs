//! Error types for toolhost-mcp.
//!
//! Capability errors follow a single taxonomy ([`ErrorCode`]) so that both
//! transports report the same failure the same way. Each transport maps the
//! code onto its own envelope: an HTTP status for the HTTP transport, a
//! JSON-RPC error code for stdio.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::capability::CapabilityKind;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// The error taxonomy shared by the engine and both transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// A collaborator registered the same name twice for one kind.
    DuplicateName,
    /// A registry lookup missed.
    NotFound,
    /// The caller referenced a capability that does not exist.
    UnknownCapability,
    /// The caller supplied arguments of the wrong shape.
    InvalidArguments,
    /// The capability's own logic failed.
    HandlerError,
    /// The wire message could not be decoded.
    ParseError,
}

impl ErrorCode {
    /// Returns the wire name of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateName => "DuplicateName",
            Self::NotFound => "NotFound",
            Self::UnknownCapability => "UnknownCapability",
            Self::InvalidArguments => "InvalidArguments",
            Self::HandlerError => "HandlerError",
            Self::ParseError => "ParseError",
        }
    }

    /// Returns the HTTP status code used to report this error.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::NotFound | Self::UnknownCapability => 404,
            Self::InvalidArguments | Self::ParseError => 400,
            Self::HandlerError | Self::DuplicateName => 500,
        }
    }

    /// Returns the JSON-RPC 2.0 error code used to report this error.
    #[must_use]
    pub const fn jsonrpc_code(self) -> i32 {
        match self {
            Self::NotFound | Self::UnknownCapability => -32601,
            Self::InvalidArguments => -32602,
            Self::ParseError => -32700,
            Self::HandlerError | Self::DuplicateName => -32603,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the capability registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A capability with this name (or URI, for resources) already exists.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// Partition the collision happened in.
        kind: CapabilityKind,
        /// The colliding name.
        name: String,
    },

    /// No capability is registered under this name.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Partition that was searched.
        kind: CapabilityKind,
        /// The requested name.
        name: String,
    },
}

impl RegistryError {
    /// Returns the taxonomy code of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateName { .. } => ErrorCode::DuplicateName,
            Self::NotFound { .. } => ErrorCode::NotFound,
        }
    }
}

/// Errors produced by a single invocation.
///
/// Every variant is terminal for the invocation that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// The requested capability is not registered.
    #[error("unknown {kind}: {name}")]
    UnknownCapability {
        /// Requested kind.
        kind: CapabilityKind,
        /// Requested name.
        name: String,
    },

    /// The arguments do not match the declared shape.
    #[error("invalid argument '{field}': expected {expected}, got {actual}")]
    InvalidArguments {
        /// First offending field.
        field: String,
        /// What the declaration asked for.
        expected: String,
        /// What the caller sent (`missing` when absent).
        actual: String,
    },

    /// The handler reported a failure; the message is passed through as-is.
    #[error("{message}")]
    HandlerError {
        /// Handler-supplied message.
        message: String,
    },
}

impl InvocationError {
    /// Creates an `InvalidArguments` error for a missing field.
    #[must_use]
    pub fn missing(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidArguments {
            field: field.into(),
            expected: expected.into(),
            actual: "missing".to_string(),
        }
    }

    /// Returns the taxonomy code of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownCapability { .. } => ErrorCode::UnknownCapability,
            Self::InvalidArguments { .. } => ErrorCode::InvalidArguments,
            Self::HandlerError { .. } => ErrorCode::HandlerError,
        }
    }
}

impl From<RegistryError> for InvocationError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { kind, name } | RegistryError::DuplicateName { kind, name } => {
                Self::UnknownCapability { kind, name }
            }
        }
    }
}
