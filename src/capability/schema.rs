//! Tool input schemas and argument validation.
//!
//! An [`InputSchema`] is a flat declaration of argument names, their primitive
//! JSON types and which of them are required. It serialises as a JSON Schema
//! object so clients can read it straight out of `tools/list`.
//!
//! Validation only checks what is declared. Keys the schema does not mention
//! are passed through untouched.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::capability::Arguments;
use crate::error::InvocationError;

/// Primitive JSON types an argument may be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON number without a fractional part.
    Integer,
    /// `true` or `false`.
    Boolean,
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
}

impl ValueType {
    /// Returns the JSON Schema name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Returns `true` if `value` is an instance of this type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_))
            | (Self::Number, Value::Number(_))
            | (Self::Boolean, Value::Bool(_))
            | (Self::Object, Value::Object(_))
            | (Self::Array, Value::Array(_)) => true,
            (Self::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            _ => false,
        }
    }
}

/// Returns the JSON type name of a value, as reported in validation errors.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declaration of a single argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    /// Declared type.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Input schema of a tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    properties: IndexMap<String, PropertySchema>,
    required: Vec<String>,
}

impl InputSchema {
    /// Creates a schema that declares no arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a required argument.
    #[must_use]
    pub fn required(
        mut self,
        name: impl Into<String>,
        value_type: ValueType,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.declare(name, value_type, description.into())
    }

    /// Declares an optional argument.
    #[must_use]
    pub fn optional(
        self,
        name: impl Into<String>,
        value_type: ValueType,
        description: impl Into<String>,
    ) -> Self {
        self.declare(name.into(), value_type, description.into())
    }

    fn declare(mut self, name: String, value_type: ValueType, description: String) -> Self {
        let description = (!description.is_empty()).then_some(description);
        self.properties.insert(
            name,
            PropertySchema {
                value_type,
                description,
            },
        );
        self
    }

    /// Returns the declared properties in declaration order.
    #[must_use]
    pub const fn properties(&self) -> &IndexMap<String, PropertySchema> {
        &self.properties
    }

    /// Returns `true` if `name` must be present.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Validates arguments against this schema.
    ///
    /// Declared properties are checked in declaration order, so the error
    /// always names the first offending field.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::InvalidArguments`] if a required argument is
    /// missing or a present argument has the wrong type.
    pub fn validate(&self, arguments: &Arguments) -> Result<(), InvocationError> {
        for (name, property) in &self.properties {
            match arguments.get(name) {
                None if self.is_required(name) => {
                    return Err(InvocationError::missing(
                        name,
                        property.value_type.as_str(),
                    ));
                }
                Some(value) if !property.value_type.matches(value) => {
                    return Err(InvocationError::InvalidArguments {
                        field: name.clone(),
                        expected: property.value_type.as_str().to_string(),
                        actual: type_name(value).to_string(),
                    });
                }
                _ => {}
            }
        }

        // Required names with no property declaration only need to be present.
        if let Some(name) = self
            .required
            .iter()
            .find(|name| !self.properties.contains_key(*name) && !arguments.contains_key(*name))
        {
            return Err(InvocationError::missing(name, "any value"));
        }

        Ok(())
    }
}

impl Serialize for InputSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &self.properties)?;
        map.serialize_entry("required", &self.required)?;
        map.end()
    }
}
