//! LLM provider abstraction.
//!
//! The kernel talks to the remote model only through [`LlmProvider`]. A
//! provider receives the conversation in the internal message format plus a
//! [`GenerateConfig`], and answers with text or with tool calls the kernel
//! must execute.

use crate::provider::types::generate::GenerateConfig;
use crate::provider::types::internal::InternalMessage;
use anyhow::Result;
use futures_util::Stream;
use std::collections::HashMap;
use std::pin::Pin;

// Re-export streaming types from umf
pub use umf::StreamChunk;

// Re-export tool types from umf
pub use umf::{FunctionCall, ToolCall};

/// Response from a generation request
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateResponse {
    /// Text content response
    Content(String),
    /// Tool calls that need to be executed
    ToolCalls {
        /// Text the model produced alongside the calls (often empty)
        text: String,
        /// The requested calls, in model order
        calls: Vec<ToolInvocation>,
    },
}

impl GenerateResponse {
    /// Text part of the response.
    pub fn text(&self) -> &str {
        match self {
            Self::Content(text) => text,
            Self::ToolCalls { text, .. } => text,
        }
    }
}

/// A tool invocation from the LLM
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool to invoke
    pub name: String,
    /// Arguments as a JSON value (already parsed)
    pub arguments: serde_json::Value,
    /// Provider-specific metadata
    pub provider_metadata: HashMap<String, String>,
}

impl ToolInvocation {
    /// Create an invocation without provider metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
            provider_metadata: HashMap::new(),
        }
    }

    /// Build an invocation from an accumulated streaming tool call.
    ///
    /// Arguments that are not valid JSON are kept as a JSON string; the
    /// call then fails with a serialization error the model gets to see.
    pub fn from_tool_call(call: &ToolCall) -> Self {
        let raw = call.function.arguments.trim();
        let arguments = if raw.is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(raw)
                .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
        };
        Self::new(call.id.clone(), call.function.name.clone(), arguments)
    }
}

/// Type alias for streaming response
pub type StreamingResponse = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// Core trait that all LLM providers must implement
///
/// # Example
///
/// ```ignore
/// use toolchat::provider::{GenerateConfig, GenerateResponse, InternalMessage, LlmProvider};
///
/// async fn ask(provider: &dyn LlmProvider) -> anyhow::Result<()> {
///     let messages = vec![InternalMessage::user("What is the weather in London?")];
///     let config = GenerateConfig::default();
///
///     match provider.generate(messages, &config).await? {
///         GenerateResponse::Content(text) => println!("{}", text),
///         GenerateResponse::ToolCalls { calls, .. } => println!("{} tool calls", calls.len()),
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a non-streaming response from the LLM
    ///
    /// # Arguments
    /// * `messages` - Conversation history in internal format
    /// * `config` - Generation configuration (model, temperature, tools, etc.)
    async fn generate(
        &self,
        messages: Vec<InternalMessage>,
        config: &GenerateConfig,
    ) -> Result<GenerateResponse>;

    /// Generate a streaming response from the LLM
    ///
    /// The stream yields text deltas and tool-call deltas and ends after
    /// [`StreamChunk::Done`] or when the connection closes. Dropping the
    /// stream releases the underlying connection.
    async fn generate_stream(
        &self,
        messages: Vec<InternalMessage>,
        config: &GenerateConfig,
    ) -> Result<StreamingResponse>;

    /// Provider identifier (e.g., "openai", "azure-openai")
    fn provider_name(&self) -> &str;

    /// Model or deployment used when the request config names none.
    fn default_model(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use umf::FunctionCall;

    fn call(arguments: &str) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            r#type: "function".to_string(),
            function: FunctionCall {
                name: "get_weather".to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    #[test]
    fn test_from_tool_call_parses_arguments() {
        let invocation = ToolInvocation::from_tool_call(&call(r#"{"city":"London"}"#));
        assert_eq!(invocation.id, "call_1");
        assert_eq!(invocation.name, "get_weather");
        assert_eq!(invocation.arguments["city"], "London");
    }

    #[test]
    fn test_from_tool_call_empty_arguments() {
        let invocation = ToolInvocation::from_tool_call(&call(""));
        assert!(invocation.arguments.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_from_tool_call_invalid_arguments() {
        let invocation = ToolInvocation::from_tool_call(&call("{not json"));
        assert_eq!(invocation.arguments, serde_json::json!("{not json"));
    }

    #[test]
    fn test_generate_response_text() {
        assert_eq!(GenerateResponse::Content("hi".into()).text(), "hi");
        let response = GenerateResponse::ToolCalls {
            text: String::new(),
            calls: vec![ToolInvocation::new("c", "date", serde_json::json!({}))],
        };
        assert_eq!(response.text(), "");
    }
}
