//! Immutable capability metadata.

use serde::Serialize;

use crate::capability::{CapabilityKind, InputSchema};

/// Common view over the three descriptor types.
///
/// The registry keys each partition by [`Descriptor::key`]: the name for tools
/// and prompts, the URI for resources.
pub trait Descriptor: Serialize {
    /// Kind of capability this descriptor belongs to.
    const KIND: CapabilityKind;

    /// Unique name within the kind.
    fn name(&self) -> &str;

    /// Lookup key within the kind.
    fn key(&self) -> &str {
        self.name()
    }
}

/// Metadata for a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Declared arguments.
    pub input_schema: InputSchema,
}

impl ToolDescriptor {
    /// Creates a tool descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

impl Descriptor for ToolDescriptor {
    const KIND: CapabilityKind = CapabilityKind::Tool;

    fn name(&self) -> &str {
        &self.name
    }
}

/// Metadata for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Opaque identifier the resource is read by.
    pub uri: String,
    /// Unique resource name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// MIME type hint for the content.
    pub mime_type: String,
}

impl ResourceDescriptor {
    /// Creates a resource descriptor.
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: description.into(),
            mime_type: mime_type.into(),
        }
    }
}

impl Descriptor for ResourceDescriptor {
    const KIND: CapabilityKind = CapabilityKind::Resource;

    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> &str {
        &self.uri
    }
}

/// A named prompt argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptArgument {
    /// Argument name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Whether callers must supply it.
    pub required: bool,
}

impl PromptArgument {
    /// Creates a required argument.
    #[must_use]
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
        }
    }

    /// Creates an optional argument.
    #[must_use]
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
        }
    }
}

/// Metadata for a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptDescriptor {
    /// Unique prompt name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Arguments, in the order clients should present them.
    pub arguments: Vec<PromptArgument>,
}

impl PromptDescriptor {
    /// Creates a prompt descriptor with no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            arguments: Vec::new(),
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn argument(mut self, argument: PromptArgument) -> Self {
        self.arguments.push(argument);
        self
    }
}

impl Descriptor for PromptDescriptor {
    const KIND: CapabilityKind = CapabilityKind::Prompt;

    fn name(&self) -> &str {
        &self.name
    }
}
