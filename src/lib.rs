//! toolchat - chat clients over a remote LLM with local tool invocation
//!
//! toolchat connects a provider-agnostic chat UI contract to an OpenAI or
//! Azure OpenAI chat-completions model, executing the model's tool calls
//! against locally registered functions:
//!
//! - **`config`** - TOML configuration loading
//! - **`observability`** - Markdown transcript logging and tracing events
//! - **`invoker`** - Tool descriptors, functions, registry and plugins
//! - **`plugins`** - Built-in weather and time tools
//! - **`provider`** - LLM provider trait and the OpenAI/Azure implementation
//! - **`kernel`** - Orchestration engine with the auto-invoke loop
//! - **`chat`** / **`adapter`** - Chat-client contract and its kernel adapter
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! toolchat = { version = "0.1", default-features = false, features = ["invoker", "plugins"] }
//! # Or enable everything (the default):
//! toolchat = { version = "0.1", features = ["all"] }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use toolchat::prelude::*;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let loader = ConfigurationLoader::new(None)?;
//! let kernel = Kernel::from_config(&loader.config)?;
//! let settings = loader.config.execution.to_settings();
//! let client: Arc<dyn ChatClient> = Arc::new(KernelChatClient::new(Arc::new(kernel), settings));
//!
//! let history = vec![ChatMessage::user("What is the weather in London?")];
//! let reply = client.send(&history, &ChatOptions::default()).await?;
//! println!("{}", reply.text());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Transcript logging (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

/// Tool registry (enabled with the `invoker` feature)
#[cfg(feature = "invoker")]
pub mod invoker;

/// Built-in tool plugins (enabled with the `plugins` feature)
#[cfg(feature = "plugins")]
pub mod plugins;

/// LLM Provider abstraction (enabled with the `provider` feature)
#[cfg(feature = "provider")]
pub mod provider;

/// Model orchestration (enabled with the `orchestration` feature)
#[cfg(feature = "orchestration")]
pub mod kernel;

/// Chat-client contract (enabled with the `chat` feature)
#[cfg(feature = "chat")]
pub mod chat;

/// Kernel-backed chat client (enabled with the `chat` feature)
#[cfg(feature = "chat")]
pub mod adapter;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "config")]
    pub use crate::config::{Configuration, ConfigurationLoader, ProviderConfig, ProviderKind};

    #[cfg(feature = "observability")]
    pub use crate::observability::Logger;

    #[cfg(feature = "invoker")]
    pub use crate::invoker::{
        FunctionRegistry, InvokerError, InvokerRegistry, KernelFunction, Plugin, ToolArguments,
        ToolDescriptor, ToolParameter,
    };

    #[cfg(feature = "plugins")]
    pub use crate::plugins::{TimePlugin, WeatherPlugin};

    #[cfg(feature = "provider")]
    pub use crate::provider::{
        GenerateConfig, GenerateResponse, InternalMessage, InternalToolDefinition, LlmProvider,
        OpenAiProvider, ProviderFactory, ToolInvocation,
    };

    #[cfg(feature = "orchestration")]
    pub use crate::kernel::{
        ExecutionSettings, Kernel, KernelBuilder, KernelRequest, RequestCancelled,
        StreamingChatContent, ToolCoordinator, ToolExecutionResult,
    };

    #[cfg(feature = "chat")]
    pub use crate::adapter::KernelChatClient;

    #[cfg(feature = "chat")]
    pub use crate::chat::{
        ChatClient, ChatClientMetadata, ChatCompletion, ChatError, ChatMessage,
        ChatMessageFragment, ChatOptions, ChatRole, ChatStream,
    };
}
