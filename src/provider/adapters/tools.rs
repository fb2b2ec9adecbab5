//! Tool format adapter between internal definitions and OpenAI function
//! calling.

use crate::provider::types::tools::InternalToolDefinition;
use crate::provider::ToolInvocation;
use crate::provider::{Function, FunctionCall, Tool, ToolCall};
use anyhow::{Context, Result};
use serde_json::{json, Value};

/// Adapter for converting between tool formats
pub struct ToolAdapter;

impl ToolAdapter {
    /// Convert an internal definition to an OpenAI function tool
    pub fn from_internal(internal: &InternalToolDefinition) -> Tool {
        Tool {
            r#type: "function".to_string(),
            function: Function {
                name: internal.name.clone(),
                description: internal.description.clone(),
                parameters: internal.parameters.clone(),
            },
        }
    }

    /// Render tools as the `tools` array of a chat completions request
    pub fn tools_to_json(internals: &[InternalToolDefinition]) -> Vec<Value> {
        internals
            .iter()
            .map(Self::from_internal)
            .map(|tool| {
                json!({
                    "type": tool.r#type,
                    "function": {
                        "name": tool.function.name,
                        "description": tool.function.description,
                        "parameters": tool.function.parameters,
                    }
                })
            })
            .collect()
    }

    /// Convert ToolInvocation to an OpenAI ToolCall
    ///
    /// Arguments are re-serialized to the JSON string OpenAI expects.
    pub fn invocation_to_tool_call(invocation: &ToolInvocation) -> Result<ToolCall> {
        let arguments = match &invocation.arguments {
            // Unparseable arguments are carried verbatim
            Value::String(raw) => raw.clone(),
            other => serde_json::to_string(other)?,
        };

        Ok(ToolCall {
            id: invocation.id.clone(),
            r#type: "function".to_string(),
            function: FunctionCall {
                name: invocation.name.clone(),
                arguments,
            },
        })
    }

    /// Render an invocation as an element of an assistant `tool_calls` array
    pub fn invocation_to_json(invocation: &ToolInvocation) -> Result<Value> {
        let call = Self::invocation_to_tool_call(invocation)?;
        Ok(json!({
            "id": call.id,
            "type": call.r#type,
            "function": {
                "name": call.function.name,
                "arguments": call.function.arguments,
            }
        }))
    }

    /// Parse one element of a response `tool_calls` array
    pub fn tool_call_from_json(value: &Value) -> Result<ToolInvocation> {
        let id = value["id"].as_str().context("tool call without id")?;
        let name = value["function"]["name"]
            .as_str()
            .context("tool call without function name")?;
        let raw = value["function"]["arguments"].as_str().unwrap_or_default();

        Ok(ToolInvocation::from_tool_call(&ToolCall {
            id: id.to_string(),
            r#type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: raw.to_string(),
            },
        }))
    }
}
