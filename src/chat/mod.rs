//! Chat-client contract consumed by a chat UI.
//!
//! A UI holds an `Arc<dyn ChatClient>` and calls [`ChatClient::send`] for a
//! whole reply or [`ChatClient::stream`] for incremental fragments. The
//! implementation behind it is picked by the host at construction time.

mod error;
mod types;

pub use error::ChatError;
pub use types::{
    ChatClientMetadata, ChatCompletion, ChatMessage, ChatMessageFragment, ChatOptions, ChatRole,
};

use futures_util::Stream;
use std::pin::Pin;

/// Finite, single-consumer stream of reply fragments.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatMessageFragment, ChatError>> + Send>>;

/// Generic chat client.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn ChatClient`.
#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    /// Produce the complete assistant reply to `history`.
    ///
    /// `history` must not be empty. Any tool calls are resolved before this
    /// returns.
    async fn send(
        &self,
        history: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatCompletion, ChatError>;

    /// Produce the assistant reply as a stream of fragments.
    ///
    /// Concatenating the fragment texts yields the reply. The stream ends
    /// early when the options' cancellation token fires.
    async fn stream(
        &self,
        history: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatStream, ChatError>;

    /// Provider and model behind this client.
    fn metadata(&self) -> ChatClientMetadata;
}
