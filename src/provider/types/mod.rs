//! Provider module types

pub mod generate;
pub mod internal;
pub mod tools;

pub use generate::GenerateConfig;
pub use internal::{
    assistant_with_tool_calls, message_text, message_tool_calls, ContentBlock, InternalMessage,
    MessageContent, MessageRole,
};
pub use tools::{InternalToolDefinition, ToolChoice, ToolResult};
