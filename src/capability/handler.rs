//! Handler traits.
//!
//! Each trait has a blanket implementation for plain closures, so most
//! collaborators register handlers as `|args: &Arguments| { ... }`.
//!
//! Handlers are `Send + Sync` because the HTTP transport may run them from
//! several connections at once. Any shared state a handler touches needs its
//! own synchronisation.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::capability::{Content, PromptMessage};

/// Caller-supplied arguments for tools.
pub type Arguments = Map<String, Value>;

/// Validated prompt arguments; every declared argument is present.
pub type PromptArguments = IndexMap<String, String>;

/// Return type of a tool handler.
pub type ToolResult = Result<Vec<Content>, String>;

/// Return type of a resource reader.
pub type ResourceResult = Result<String, String>;

/// Return type of a prompt builder.
pub type PromptResult = Result<Vec<PromptMessage>, String>;

/// Behaviour behind a tool.
pub trait ToolHandler: Send + Sync {
    /// Runs the tool with already-validated arguments.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the tool failed.
    fn call(&self, arguments: &Arguments) -> ToolResult;
}

impl<F> ToolHandler for F
where
    F: Fn(&Arguments) -> ToolResult + Send + Sync,
{
    fn call(&self, arguments: &Arguments) -> ToolResult {
        self(arguments)
    }
}

/// Behaviour behind a resource.
pub trait ResourceReader: Send + Sync {
    /// Returns the current content of the resource at `uri`.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the read failed.
    fn read(&self, uri: &str) -> ResourceResult;
}

impl<F> ResourceReader for F
where
    F: Fn(&str) -> ResourceResult + Send + Sync,
{
    fn read(&self, uri: &str) -> ResourceResult {
        self(uri)
    }
}

/// Behaviour behind a prompt.
pub trait PromptBuilder: Send + Sync {
    /// Builds the prompt's messages.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the prompt could not be built.
    fn build(&self, arguments: &PromptArguments) -> PromptResult;
}

impl<F> PromptBuilder for F
where
    F: Fn(&PromptArguments) -> PromptResult + Send + Sync,
{
    fn build(&self, arguments: &PromptArguments) -> PromptResult {
        self(arguments)
    }
}
