//! Model-orchestration engine.
//!
//! The kernel owns a provider and a function registry and resolves tool
//! calls for the caller:
//!
//! ```text
//! history ──► provider ──► text ───────────────────────────► reply
//!                │
//!                └─► tool calls ──► registry ──► tool results ──┐
//!                        ▲                                      │
//!                        └──────────── next round ◄─────────────┘
//! ```
//!
//! After `max_auto_invoke_attempts` rounds the kernel makes one last request
//! without tools so the model has to answer in text.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use toolchat::kernel::{ExecutionSettings, Kernel, KernelRequest};
//! use toolchat::plugins::WeatherPlugin;
//! use toolchat::provider::{InternalMessage, OpenAiProvider};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let provider = OpenAiProvider::azure(
//!     "https://contoso.openai.azure.com",
//!     "gpt-4o-mini",
//!     "api-key",
//!     "2024-06-01",
//! )?;
//! let kernel = Kernel::builder()
//!     .provider(Arc::new(provider))
//!     .plugin(&WeatherPlugin)?
//!     .build()?;
//!
//! let reply = kernel
//!     .get_chat_message_content(
//!         vec![InternalMessage::user("What is the weather in London?")],
//!         &ExecutionSettings::default(),
//!         &KernelRequest::new(),
//!     )
//!     .await?;
//! println!("{:?}", reply.text());
//! # Ok(())
//! # }
//! ```

#[allow(clippy::module_inception)]
mod kernel;
mod settings;
mod tools;

pub use kernel::{Kernel, KernelBuilder, StreamingChatContent, StreamingChatContents};
pub use settings::{
    ExecutionSettings, KernelRequest, RequestCancelled, DEFAULT_MAX_AUTO_INVOKE_ATTEMPTS,
};
pub use tools::{ToolCoordinator, ToolExecutionResult};
