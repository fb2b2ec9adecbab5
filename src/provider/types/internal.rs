//! Engine-native message format.
//!
//! The kernel and providers speak the Universal Message Format (UMF) from the
//! `umf` crate. This module re-exports those types and adds the helpers the
//! tool loop needs: assistant messages that carry tool calls, and text
//! extraction that ignores tool blocks.

use crate::provider::traits::ToolInvocation;
use std::collections::HashMap;

pub use umf::{ContentBlock, ImageSource, InternalMessage, MessageContent, MessageRole};

/// Build an assistant message requesting the given tool calls.
///
/// Any text the model produced alongside the calls is kept as a leading
/// text block.
pub fn assistant_with_tool_calls(text: &str, invocations: &[ToolInvocation]) -> InternalMessage {
    let mut blocks = Vec::with_capacity(invocations.len() + 1);
    if !text.is_empty() {
        blocks.push(ContentBlock::text(text));
    }
    for invocation in invocations {
        blocks.push(ContentBlock::tool_use(
            invocation.id.as_str(),
            invocation.name.as_str(),
            invocation.arguments.clone(),
        ));
    }

    InternalMessage {
        role: MessageRole::Assistant,
        content: MessageContent::Blocks(blocks),
        metadata: HashMap::new(),
        tool_call_id: None,
        name: None,
    }
}

/// Concatenated text of a message, skipping tool-use, tool-result and image
/// blocks.
pub fn message_text(message: &InternalMessage) -> String {
    match &message.content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Blocks(blocks) => blocks
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join(""),
    }
}

/// Tool calls carried by a message, as `(id, name, arguments)`.
pub fn message_tool_calls(message: &InternalMessage) -> Vec<ToolInvocation> {
    match &message.content {
        MessageContent::Text(_) => Vec::new(),
        MessageContent::Blocks(blocks) => blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => Some(ToolInvocation {
                    id: id.clone(),
                    name: name.clone(),
                    arguments: input.clone(),
                    provider_metadata: HashMap::new(),
                }),
                _ => None,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invocation(id: &str, city: &str) -> ToolInvocation {
        ToolInvocation {
            id: id.to_string(),
            name: "get_weather".to_string(),
            arguments: json!({ "city": city }),
            provider_metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_message_creation() {
        let msg = InternalMessage::system("You are a helpful assistant");
        assert_eq!(msg.role, MessageRole::System);
        assert_eq!(message_text(&msg), "You are a helpful assistant");

        let msg = InternalMessage::tool_result("call_1", "get_weather", "59°F (15°C)");
        assert_eq!(msg.role, MessageRole::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_assistant_with_tool_calls() {
        let msg = assistant_with_tool_calls(
            "Let me check.",
            &[invocation("call_1", "London"), invocation("call_2", "LA")],
        );
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(message_text(&msg), "Let me check.");

        let calls = message_tool_calls(&msg);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[1].arguments["city"], "LA");
    }

    #[test]
    fn test_assistant_with_tool_calls_without_text() {
        let msg = assistant_with_tool_calls("", &[invocation("call_1", "London")]);
        assert_eq!(message_text(&msg), "");
        assert_eq!(message_tool_calls(&msg).len(), 1);
    }

    #[test]
    fn test_plain_message_has_no_tool_calls() {
        let msg = InternalMessage::assistant("It is sunny.");
        assert!(message_tool_calls(&msg).is_empty());
    }

    #[test]
    fn test_role_string_conversion() {
        assert_eq!(MessageRole::System.as_str(), "system");
        assert_eq!(MessageRole::User.as_str(), "user");
        assert_eq!(MessageRole::Assistant.as_str(), "assistant");
        assert_eq!(MessageRole::Tool.as_str(), "tool");
    }
}
