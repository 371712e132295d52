//! Capability model: kinds, descriptors, handlers, outcomes and the registry.
//!
//! A capability is one of three kinds:
//!
//! - **Tool**: a side-effecting operation, invoked with `call`
//! - **Resource**: read-only data addressed by URI, invoked with `read`
//! - **Prompt**: a parameterised message template, invoked with `get`
//!
//! Collaborators register capabilities into a [`RegistryBuilder`] at start-up.
//! [`RegistryBuilder::build`] freezes it into a [`Registry`], which has no
//! mutation methods and is what the transports eventually see.

mod descriptor;
mod handler;
mod outcome;
mod registry;
pub mod schema;

use std::fmt;

use serde::Serialize;

pub use descriptor::{
    Descriptor, PromptArgument, PromptDescriptor, ResourceDescriptor, ToolDescriptor,
};
pub use handler::{
    Arguments, PromptArguments, PromptBuilder, PromptResult, ResourceReader, ResourceResult,
    ToolHandler, ToolResult,
};
pub use outcome::{
    Content, Outcome, PromptMessage, PromptOutcome, ResourceContents, ResourceOutcome, Role,
    ToolOutcome,
};
pub use registry::{Registry, RegistryBuilder};
pub use schema::{InputSchema, PropertySchema, ValueType};

/// The three kinds of capability a server can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    /// Side-effecting operation.
    Tool,
    /// Read-only named data.
    Resource,
    /// Parameterised message template.
    Prompt,
}

impl CapabilityKind {
    /// All kinds, in advertisement order.
    pub const ALL: [Self; 3] = [Self::Tool, Self::Resource, Self::Prompt];

    /// Returns the singular lowercase name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tool => "tool",
            Self::Resource => "resource",
            Self::Prompt => "prompt",
        }
    }

    /// Returns the plural name used in method paths and list envelopes.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Tool => "tools",
            Self::Resource => "resources",
            Self::Prompt => "prompts",
        }
    }

    /// Returns the invocation verb for this kind.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Tool => "call",
            Self::Resource => "read",
            Self::Prompt => "get",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
