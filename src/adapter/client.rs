//! [`ChatClient`] backed by a [`Kernel`].

use crate::adapter::roles::to_chat_history;
use crate::chat::{
    ChatClient, ChatClientMetadata, ChatCompletion, ChatError, ChatMessage, ChatMessageFragment,
    ChatOptions, ChatStream,
};
use crate::kernel::{
    ExecutionSettings, Kernel, KernelRequest, RequestCancelled, StreamingChatContent,
};
use crate::provider::types::message_text;
use crate::provider::InternalMessage;
use futures_util::{future, StreamExt};
use std::sync::Arc;

/// Chat client that routes every request through a shared kernel with
/// fixed execution settings.
#[derive(Debug, Clone)]
pub struct KernelChatClient {
    kernel: Arc<Kernel>,
    settings: ExecutionSettings,
}

impl KernelChatClient {
    /// Adapter with explicit settings
    pub fn new(kernel: Arc<Kernel>, settings: ExecutionSettings) -> Self {
        Self { kernel, settings }
    }

    /// Adapter with auto-invoke on
    pub fn with_defaults(kernel: Arc<Kernel>) -> Self {
        Self::new(kernel, ExecutionSettings::auto_invoke())
    }

    /// The wrapped kernel
    pub fn kernel(&self) -> &Arc<Kernel> {
        &self.kernel
    }

    /// Settings applied to every request
    pub fn settings(&self) -> &ExecutionSettings {
        &self.settings
    }

    fn prepare(
        history: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<(Vec<InternalMessage>, KernelRequest), ChatError> {
        let history = to_chat_history(history)?;
        if history.is_empty() {
            return Err(ChatError::EmptyHistory);
        }

        let request = KernelRequest {
            tools: options.tools.clone(),
            cancellation: options.cancellation.clone(),
        };
        Ok((history, request))
    }
}

fn from_kernel_error(error: anyhow::Error) -> ChatError {
    if error.is::<RequestCancelled>() {
        ChatError::Cancelled
    } else {
        ChatError::Provider(error)
    }
}

fn to_fragment(content: StreamingChatContent) -> Option<ChatMessageFragment> {
    if !content.tool_calls.is_empty() || content.text.is_empty() {
        return None;
    }
    Some(ChatMessageFragment::assistant(content.text))
}

#[async_trait::async_trait]
impl ChatClient for KernelChatClient {
    async fn send(
        &self,
        history: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatCompletion, ChatError> {
        let (history, request) = Self::prepare(history, options)?;

        let reply = self
            .kernel
            .get_chat_message_content(history, &self.settings, &request)
            .await
            .map_err(from_kernel_error)?;

        Ok(ChatCompletion {
            message: ChatMessage::assistant(message_text(&reply)),
        })
    }

    async fn stream(
        &self,
        history: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatStream, ChatError> {
        let (history, request) = Self::prepare(history, options)?;

        let contents = self
            .kernel
            .get_streaming_chat_message_contents(history, &self.settings, &request)
            .await
            .map_err(from_kernel_error)?;

        let fragments = contents.filter_map(|item| {
            future::ready(match item {
                Ok(content) => to_fragment(content).map(Ok),
                Err(e) => Some(Err(from_kernel_error(e))),
            })
        });

        Ok(Box::pin(fragments))
    }

    fn metadata(&self) -> ChatClientMetadata {
        let provider = self.kernel.provider();
        ChatClientMetadata {
            provider_name: provider.provider_name().to_string(),
            model: self
                .settings
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model()),
        }
    }
}
