//! Transport-neutral invocation results.
//!
//! Both transports serialise an [`Outcome`] as-is: the HTTP transport as the
//! response body, stdio as the JSON-RPC `result`. Only the envelope differs.

use serde::Serialize;

/// A block of content returned by a tool or embedded in a prompt message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

impl Content {
    /// Creates a text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Result of a tool call. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutcome {
    /// Content returned by the tool.
    pub content: Vec<Content>,
}

impl ToolOutcome {
    /// Wraps handler output; an empty result becomes one empty text block.
    #[must_use]
    pub fn new(content: Vec<Content>) -> Self {
        if content.is_empty() {
            return Self {
                content: vec![Content::text("")],
            };
        }
        Self { content }
    }
}

/// One piece of resource content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    /// URI that was read.
    pub uri: String,
    /// MIME type hint from the descriptor.
    pub mime_type: String,
    /// The content itself.
    pub content: String,
}

/// Result of a resource read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceOutcome {
    /// Contents of the resource.
    pub contents: Vec<ResourceContents>,
}

/// Speaker of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user.
    User,
    /// The model.
    Assistant,
}

/// A single prompt message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    /// Who is speaking.
    pub role: Role,
    /// What is said.
    pub content: Content,
}

impl PromptMessage {
    /// Creates a user text message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::text(text),
        }
    }

    /// Creates an assistant text message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::text(text),
        }
    }
}

/// Result of a prompt get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptOutcome {
    /// Description copied from the descriptor.
    pub description: String,
    /// Messages in order.
    pub messages: Vec<PromptMessage>,
}

/// Success payload of any invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Tool call result.
    Tool(ToolOutcome),
    /// Resource read result.
    Resource(ResourceOutcome),
    /// Prompt get result.
    Prompt(PromptOutcome),
}
