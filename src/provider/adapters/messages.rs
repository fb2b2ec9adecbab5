//! Internal message to OpenAI chat message adapter.
//!
//! Assistant tool-use blocks become a `tool_calls` array; tool results
//! become `role: "tool"` messages carrying `tool_call_id`.

use crate::provider::adapters::tools::ToolAdapter;
use crate::provider::types::internal::{ContentBlock, InternalMessage, MessageContent};
use crate::provider::ToolInvocation;
use anyhow::Result;
use serde_json::{json, Map, Value};

/// Adapter for rendering internal messages as OpenAI chat messages
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert a conversation to OpenAI `messages`
    pub fn to_openai_messages(messages: &[InternalMessage]) -> Result<Vec<Value>> {
        messages.iter().map(Self::to_openai).collect()
    }

    /// Convert a single internal message to OpenAI format
    pub fn to_openai(msg: &InternalMessage) -> Result<Value> {
        let role = msg.role.as_str();

        let blocks = match &msg.content {
            MessageContent::Text(text) => {
                let mut out = json!({ "role": role, "content": text });
                if let Some(ref id) = msg.tool_call_id {
                    out["tool_call_id"] = json!(id);
                }
                return Ok(out);
            }
            MessageContent::Blocks(blocks) => blocks,
        };

        let mut text_parts = Vec::new();
        let mut tool_calls = Vec::new();
        let mut tool_call_id = msg.tool_call_id.clone();

        for block in blocks {
            match block {
                ContentBlock::Text { text } => text_parts.push(text.clone()),
                ContentBlock::ToolUse { id, name, input } => {
                    let invocation = ToolInvocation::new(id.clone(), name.clone(), input.clone());
                    tool_calls.push(ToolAdapter::invocation_to_json(&invocation)?);
                }
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                } => {
                    tool_call_id.get_or_insert_with(|| tool_use_id.clone());
                    text_parts.push(content.clone());
                }
                // Images are not sent by this client
                ContentBlock::Image { .. } => {}
            }
        }

        let content = text_parts.join("\n");
        let mut out = Map::new();
        out.insert("role".to_string(), json!(role));

        if !tool_calls.is_empty() {
            // OpenAI expects null content on a pure tool-call turn
            out.insert(
                "content".to_string(),
                if content.is_empty() { Value::Null } else { json!(content) },
            );
            out.insert("tool_calls".to_string(), Value::Array(tool_calls));
        } else {
            out.insert("content".to_string(), json!(content));
            if let Some(id) = tool_call_id {
                out.insert("tool_call_id".to_string(), json!(id));
            }
        }

        Ok(Value::Object(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::internal::{assistant_with_tool_calls, MessageRole};

    #[test]
    fn test_simple_message_conversion() {
        let out = MessageAdapter::to_openai(&InternalMessage::user("Hello, world!")).unwrap();
        assert_eq!(out["role"], "user");
        assert_eq!(out["content"], "Hello, world!");
        assert!(out.get("tool_calls").is_none());
    }

    #[test]
    fn test_tool_call_message_conversion() {
        let msg = assistant_with_tool_calls(
            "",
            &[ToolInvocation::new(
                "call_123",
                "get_weather",
                json!({ "city": "London" }),
            )],
        );
        assert_eq!(msg.role, MessageRole::Assistant);

        let out = MessageAdapter::to_openai(&msg).unwrap();
        assert_eq!(out["role"], "assistant");
        assert!(out["content"].is_null());
        assert_eq!(out["tool_calls"][0]["id"], "call_123");
        assert_eq!(out["tool_calls"][0]["type"], "function");
        assert_eq!(out["tool_calls"][0]["function"]["name"], "get_weather");

        let args: Value =
            serde_json::from_str(out["tool_calls"][0]["function"]["arguments"].as_str().unwrap())
                .unwrap();
        assert_eq!(args["city"], "London");
    }

    #[test]
    fn test_tool_result_message_conversion() {
        let msg = InternalMessage::tool_result("call_123", "get_weather", "59°F (15°C)");
        let out = MessageAdapter::to_openai(&msg).unwrap();
        assert_eq!(out["role"], "tool");
        assert_eq!(out["tool_call_id"], "call_123");
        assert_eq!(out["content"], "59°F (15°C)");
    }

    #[test]
    fn test_conversation_conversion_keeps_order() {
        let messages = vec![
            InternalMessage::system("You are helpful"),
            InternalMessage::user("Hello"),
            InternalMessage::assistant("Hi there!"),
        ];

        let out = MessageAdapter::to_openai_messages(&messages).unwrap();
        let roles: Vec<&str> = out.iter().map(|m| m["role"].as_str().unwrap()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
        assert_eq!(out[2]["content"], "Hi there!");
    }
}
