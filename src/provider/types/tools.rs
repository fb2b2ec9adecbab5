//! Provider-agnostic tool definitions.
//!
//! Descriptors from the function registry are converted into this shape
//! before they are sent to a provider, which renders them in its own wire
//! format.

use crate::invoker::ToolDescriptor;
use serde::{Deserialize, Serialize};

/// Provider-agnostic tool definition: name, description and a JSON Schema
/// for the parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalToolDefinition {
    /// Tool name (function name)
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

impl InternalToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Validate that the parameters is an object schema
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.is_empty() {
            anyhow::bail!("Tool name must not be empty");
        }

        let Some(obj) = self.parameters.as_object() else {
            anyhow::bail!("Tool parameters must be a JSON object (schema)");
        };
        if !obj.contains_key("type") {
            anyhow::bail!("Tool parameters schema must have 'type' field");
        }

        Ok(())
    }
}

impl From<&ToolDescriptor> for InternalToolDefinition {
    fn from(descriptor: &ToolDescriptor) -> Self {
        Self::new(
            descriptor.name.clone(),
            descriptor.description.clone(),
            descriptor.to_json_schema(),
        )
    }
}

/// Tool choice option for controlling LLM tool usage
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Let the LLM decide whether to use tools
    #[default]
    Auto,
    /// Force the LLM to use a tool
    Required,
    /// Prevent the LLM from using tools
    None,
    /// Force a specific tool to be used
    Specific {
        /// Tool name
        name: String,
    },
}

impl ToolChoice {
    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Auto => "auto",
            Self::Required => "required",
            Self::None => "none",
            Self::Specific { .. } => "specific",
        }
    }

    /// OpenAI-style `tool_choice` value.
    pub fn to_openai_value(&self) -> serde_json::Value {
        match self {
            Self::Specific { name } => serde_json::json!({
                "type": "function",
                "function": { "name": name }
            }),
            other => serde_json::Value::String(other.as_str().to_string()),
        }
    }
}

/// Result from a tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool invocation this is a result for
    pub invocation_id: String,
    /// Name of the tool that ran
    pub name: String,
    /// Tool output content
    pub content: String,
    /// Whether this is an error result
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(
        invocation_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            name: name.into(),
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(
        invocation_id: impl Into<String>,
        name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            name: name.into(),
            content: error.into(),
            is_error: true,
        }
    }

    /// Convert into the tool-role message fed back to the model.
    pub fn into_message(self) -> crate::provider::types::internal::InternalMessage {
        crate::provider::types::internal::InternalMessage::tool_result(
            self.invocation_id.as_str(),
            self.name.as_str(),
            self.content.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::{ParameterType, ToolParameter};

    #[test]
    fn test_from_descriptor() {
        let descriptor = ToolDescriptor::new("get_weather", "Gets the current weather in the city")
            .with_parameter(ToolParameter::string("city", "The name of the city"));

        let tool = InternalToolDefinition::from(&descriptor);
        assert_eq!(tool.name, "get_weather");
        assert_eq!(tool.parameters["type"], "object");
        assert_eq!(tool.parameters["properties"]["city"]["type"], "string");
        assert_eq!(tool.parameters["required"][0], "city");
        assert!(tool.validate().is_ok());
    }

    #[test]
    fn test_from_descriptor_without_parameters() {
        let descriptor = ToolDescriptor::new("date", "Get the current date");
        let tool = InternalToolDefinition::from(&descriptor);
        assert!(tool.validate().is_ok());
        assert!(tool.parameters["properties"].as_object().unwrap().is_empty());

        let descriptor = ToolDescriptor::new("days_ago", "Date N days ago")
            .with_parameter(ToolParameter::new("days", "Days", ParameterType::Integer));
        let tool = InternalToolDefinition::from(&descriptor);
        assert_eq!(tool.parameters["properties"]["days"]["type"], "integer");
    }

    #[test]
    fn test_tool_validation() {
        let tool = InternalToolDefinition::new("test", "Test tool", serde_json::json!("string"));
        assert!(tool.validate().is_err());

        let tool = InternalToolDefinition::new(
            "test",
            "Test tool",
            serde_json::json!({ "properties": {} }),
        );
        assert!(tool.validate().is_err());

        let tool = InternalToolDefinition::new("", "Nameless", serde_json::json!({"type": "object"}));
        assert!(tool.validate().is_err());
    }

    #[test]
    fn test_tool_choice() {
        assert_eq!(ToolChoice::default(), ToolChoice::Auto);
        assert_eq!(ToolChoice::Auto.to_openai_value(), "auto");
        assert_eq!(ToolChoice::None.to_openai_value(), "none");

        let specific = ToolChoice::Specific {
            name: "get_weather".to_string(),
        };
        assert_eq!(specific.as_str(), "specific");
        assert_eq!(specific.to_openai_value()["function"]["name"], "get_weather");
    }

    #[test]
    fn test_tool_result_into_message() {
        let result = ToolResult::success("call_1", "get_weather", "59°F (15°C)");
        assert!(!result.is_error);

        let message = result.into_message();
        assert_eq!(message.tool_call_id.as_deref(), Some("call_1"));

        let result = ToolResult::error("call_2", "nope", "Function 'nope' not found");
        assert!(result.is_error);
        assert_eq!(result.content, "Function 'nope' not found");
    }
}
