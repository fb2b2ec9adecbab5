//! Tool descriptor types: the schema half of a registered function.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Scalar type of a tool parameter.
///
/// Only scalar types are supported; the remote model passes arguments as a
/// flat JSON object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
	/// UTF-8 text.
	String,
	/// Whole number.
	Integer,
	/// Any JSON number.
	Number,
	/// `true` / `false`.
	Boolean,
}

impl ParameterType {
	/// JSON Schema type keyword for this parameter type.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Integer => "integer",
			Self::Number => "number",
			Self::Boolean => "boolean",
		}
	}

	/// Check whether a JSON value is acceptable for this type.
	pub fn accepts(&self, value: &Value) -> bool {
		match self {
			Self::String => value.is_string(),
			Self::Integer => value.is_i64() || value.is_u64(),
			Self::Number => value.is_number(),
			Self::Boolean => value.is_boolean(),
		}
	}
}

impl fmt::Display for ParameterType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Default for ParameterType {
	fn default() -> Self {
		Self::String
	}
}

/// One declared parameter of a tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
	/// Parameter name as the model must spell it.
	pub name: String,
	/// Human-readable description for LLM consumption.
	pub description: String,
	/// Scalar type.
	#[serde(rename = "type", default)]
	pub kind: ParameterType,
	/// Whether the model must supply this parameter.
	#[serde(default = "default_required")]
	pub required: bool,
}

fn default_required() -> bool {
	true
}

impl ToolParameter {
	/// Create a required parameter.
	pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ParameterType) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			kind,
			required: true,
		}
	}

	/// Create a required string parameter.
	pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
		Self::new(name, description, ParameterType::String)
	}

	/// Mark this parameter as optional.
	pub fn optional(mut self) -> Self {
		self.required = false;
		self
	}
}

/// The declared name, description and parameter schema of a tool.
///
/// Parameters keep their declaration order, which is also the order they
/// appear in the generated JSON schema.
///
/// # Example
///
/// ```
/// use toolchat::invoker::{ToolDescriptor, ToolParameter};
///
/// let desc = ToolDescriptor::new("get_weather", "Gets the current weather in the city")
///     .with_parameter(ToolParameter::string("city", "The name of the city"));
///
/// let schema = desc.to_openai_function();
/// assert_eq!(schema["function"]["name"], "get_weather");
/// assert_eq!(schema["function"]["parameters"]["required"][0], "city");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
	/// Unique function name within a registry.
	pub name: String,

	/// Human-readable description for LLM consumption.
	///
	/// This should clearly explain what the tool does and when to use it.
	pub description: String,

	/// Declared parameters in order.
	#[serde(default)]
	pub parameters: Vec<ToolParameter>,
}

impl ToolDescriptor {
	/// Create a descriptor with no parameters.
	pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			parameters: Vec::new(),
		}
	}

	/// Append a parameter using builder pattern.
	pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
		self.parameters.push(parameter);
		self
	}

	/// Look up a declared parameter by name.
	pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
		self.parameters.iter().find(|p| p.name == name)
	}

	/// Check if this tool declares any parameters.
	pub fn has_parameters(&self) -> bool {
		!self.parameters.is_empty()
	}

	/// Build the JSON Schema object describing the parameters.
	pub fn to_json_schema(&self) -> Value {
		let mut properties = Map::new();
		let mut required = Vec::new();
		for param in &self.parameters {
			properties.insert(
				param.name.clone(),
				json!({
					"type": param.kind.as_str(),
					"description": param.description,
				}),
			);
			if param.required {
				required.push(Value::String(param.name.clone()));
			}
		}

		json!({
			"type": "object",
			"properties": properties,
			"required": required,
		})
	}

	/// Generate an OpenAI-compatible function calling schema.
	pub fn to_openai_function(&self) -> Value {
		json!({
			"type": "function",
			"function": {
				"name": self.name,
				"description": self.description,
				"parameters": self.to_json_schema(),
			}
		})
	}
}
