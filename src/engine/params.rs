//! Wire parameter shapes shared by both transports.
//!
//! `tools/call`, `resources/read` and `prompts/get` take the same body on HTTP
//! as they take for `params` on stdio. Decoding goes through one function so a
//! malformed body is reported identically on both.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::capability::schema::type_name;
use crate::capability::{Arguments, CapabilityKind};
use crate::engine::InvocationRequest;
use crate::error::InvocationError;

/// Parameters that decode into an [`InvocationRequest`].
pub trait WireParams: DeserializeOwned {
    /// Kind of capability these parameters address.
    const KIND: CapabilityKind;

    /// Human-readable shape, used in error messages.
    const SHAPE: &'static str;

    /// Converts the decoded parameters into a request.
    fn into_request(self) -> InvocationRequest;
}

/// Parameters of `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Option<Arguments>,
}

impl WireParams for ToolCallParams {
    const KIND: CapabilityKind = CapabilityKind::Tool;
    const SHAPE: &'static str = "{name: string, arguments?: object}";

    fn into_request(self) -> InvocationRequest {
        InvocationRequest::tool(self.name, self.arguments.unwrap_or_default())
    }
}

/// Parameters of `resources/read`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceReadParams {
    /// URI of the resource to read.
    pub uri: String,
}

impl WireParams for ResourceReadParams {
    const KIND: CapabilityKind = CapabilityKind::Resource;
    const SHAPE: &'static str = "{uri: string}";

    fn into_request(self) -> InvocationRequest {
        InvocationRequest::resource(self.uri)
    }
}

/// Parameters of `prompts/get`.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptGetParams {
    /// Name of the prompt.
    pub name: String,
    /// Prompt arguments.
    #[serde(default)]
    pub arguments: Option<Arguments>,
}

impl WireParams for PromptGetParams {
    const KIND: CapabilityKind = CapabilityKind::Prompt;
    const SHAPE: &'static str = "{name: string, arguments?: object}";

    fn into_request(self) -> InvocationRequest {
        InvocationRequest::prompt(self.name, self.arguments.unwrap_or_default())
    }
}

/// Decodes wire parameters into an invocation request.
///
/// # Errors
///
/// Returns [`InvocationError::InvalidArguments`] if `params` is not an object
/// or does not have the expected fields.
pub fn decode_params<P: WireParams>(params: Value) -> Result<InvocationRequest, InvocationError> {
    if !params.is_object() {
        return Err(InvocationError::InvalidArguments {
            field: "params".to_string(),
            expected: P::SHAPE.to_string(),
            actual: type_name(&params).to_string(),
        });
    }

    serde_json::from_value::<P>(params)
        .map(P::into_request)
        .map_err(|e| InvocationError::InvalidArguments {
            field: "params".to_string(),
            expected: P::SHAPE.to_string(),
            actual: e.to_string(),
        })
}
