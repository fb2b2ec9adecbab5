//! LLM Provider abstraction module
//!
//! This module provides the provider trait, the provider-agnostic message
//! and tool types, the OpenAI/Azure chat-completions implementation and a
//! factory that builds a provider from configuration.

pub mod adapters;
pub mod factory;
pub mod openai;
pub mod traits;
pub mod types;

// Re-export main types
pub use adapters::{MessageAdapter, ToolAdapter};
pub use factory::ProviderFactory;
pub use openai::{ApiFlavor, OpenAiProvider, SseDecoder};
pub use traits::{GenerateResponse, LlmProvider, StreamingResponse, ToolInvocation};
pub use types::{
    GenerateConfig, InternalMessage, InternalToolDefinition, MessageContent, MessageRole, ToolChoice,
    ToolResult,
};

// Re-export streaming types from umf
pub use umf::StreamChunk;

// Re-export tool types from umf
pub use umf::{Function, FunctionCall, Tool, ToolCall};
