//! Capabilities the binary registers at boot.
//!
//! These are ordinary collaborators: they go through the same
//! [`RegistryBuilder`] calls as any embedding application would make.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::capability::{
    Arguments, Content, InputSchema, PromptArgument, PromptArguments, PromptDescriptor,
    PromptMessage, PromptResult, Registry, RegistryBuilder, ResourceDescriptor, ResourceResult,
    ToolDescriptor, ToolResult, ValueType,
};
use crate::error::RegistryError;

/// URI of the about resource.
pub const ABOUT_URI: &str = "server://about";

const DEFAULT_INDENT: u64 = 2;
const MAX_INDENT: u64 = 16;

/// Registers every builtin capability on `builder`.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateName`] if `builder` already holds a
/// capability with a builtin name.
pub fn register(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder
        .register_tool(
            ToolDescriptor::new(
                "echo",
                "Returns the given message unchanged.",
                InputSchema::new().required("message", ValueType::String, "Text to echo back"),
            ),
            echo,
        )?
        .register_tool(
            ToolDescriptor::new(
                "json_format",
                "Pretty-prints a JSON object.",
                InputSchema::new()
                    .required("value", ValueType::Object, "Object to format")
                    .optional(
                        "indent",
                        ValueType::Integer,
                        "Spaces per indentation level (0-16, default 2)",
                    ),
            ),
            json_format,
        )?
        .register_resource(
            ResourceDescriptor::new(
                ABOUT_URI,
                "about",
                "What this server is and how to talk to it.",
                "text/markdown",
            ),
            about,
        )?
        .register_prompt(
            PromptDescriptor::new(
                "describe_capability",
                "Asks the model to explain one of the server's capabilities.",
            )
            .argument(PromptArgument::required(
                "name",
                "Name of the tool, resource or prompt",
            ))
            .argument(PromptArgument::optional(
                "focus",
                "Aspect to concentrate on, such as arguments or errors",
            )),
            describe_capability,
        )?;
    Ok(())
}

/// Builds a registry holding only the builtins.
///
/// # Errors
///
/// Never fails in practice; the signature mirrors [`register`].
pub fn registry() -> Result<Registry, RegistryError> {
    let mut builder = RegistryBuilder::new();
    register(&mut builder)?;
    Ok(builder.build())
}

fn echo(arguments: &Arguments) -> ToolResult {
    let message = arguments
        .get("message")
        .and_then(Value::as_str)
        .ok_or("message must be a string")?;
    Ok(vec![Content::text(message)])
}

fn json_format(arguments: &Arguments) -> ToolResult {
    let value = arguments.get("value").ok_or("value is required")?;

    let indent = match arguments.get("indent") {
        None => DEFAULT_INDENT,
        Some(raw) => raw
            .as_u64()
            .filter(|n| *n <= MAX_INDENT)
            .ok_or_else(|| format!("indent must be between 0 and {MAX_INDENT}, got {raw}"))?,
    };
    let pad = " ".repeat(usize::try_from(indent).map_err(|e| e.to_string())?);

    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(pad.as_bytes()));
    value.serialize(&mut serializer).map_err(|e| e.to_string())?;

    let text = String::from_utf8(out).map_err(|e| e.to_string())?;
    Ok(vec![Content::text(text)])
}

fn about(_uri: &str) -> ResourceResult {
    Ok(format!(
        "# {name} {version}\n\n\
         Hosts tools, resources and prompts behind two transports:\n\n\
         - newline-delimited JSON-RPC 2.0 on stdin/stdout\n\
         - JSON over HTTP (`/tools/call`, `/resources/read`, `/prompts/get`)\n",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    ))
}

fn describe_capability(arguments: &PromptArguments) -> PromptResult {
    let name = arguments.get("name").map_or("", String::as_str);
    let focus = arguments.get("focus").map_or("", String::as_str);

    let mut text = format!(
        "Explain what the capability `{name}` does, what it expects as input and what it returns."
    );
    if !focus.is_empty() {
        text.push_str(&format!(" Concentrate on {focus}."));
    }
    Ok(vec![PromptMessage::user(text)])
}
