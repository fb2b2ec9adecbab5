//! Messages exchanged with a chat UI.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Author of a chat message.
///
/// `Other` carries any role string a UI may send that is not one of the four
/// defined roles. It cannot be translated for the model and is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChatRole {
    /// Instructions for the model
    System,
    /// The human
    User,
    /// The model
    Assistant,
    /// Tool output
    Tool,
    /// Unrecognised role
    Other(String),
}

impl ChatRole {
    /// Lowercase role name
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::Other(role) => role,
        }
    }
}

impl From<&str> for ChatRole {
    fn from(role: &str) -> Self {
        match role {
            "system" => Self::System,
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "tool" => Self::Tool,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ChatRole {
    fn from(role: String) -> Self {
        Self::from(role.as_str())
    }
}

impl From<ChatRole> for String {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::Other(role) => role,
            defined => defined.as_str().to_string(),
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of a conversation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: ChatRole,
    text: String,
}

impl ChatMessage {
    /// Message with an explicit role
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// System message
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(ChatRole::System, text)
    }

    /// User message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    /// Assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, text)
    }

    /// Tool message
    pub fn tool(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Tool, text)
    }

    /// Author role
    pub fn role(&self) -> &ChatRole {
        &self.role
    }

    /// Message text
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Result of [`ChatClient::send`](crate::chat::ChatClient::send).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    /// The reply, always from the assistant
    pub message: ChatMessage,
}

impl ChatCompletion {
    /// Reply text
    pub fn text(&self) -> &str {
        self.message.text()
    }
}

/// One streamed delta of the assistant's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageFragment {
    /// Always `Assistant`
    pub role: ChatRole,
    /// Text delta
    pub text: String,
}

impl ChatMessageFragment {
    /// Assistant fragment
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// Request-scoped options.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Only advertise these tools to the model (None = all registered tools)
    pub tools: Option<Vec<String>>,
    /// Caller's cancellation token
    pub cancellation: Option<CancellationToken>,
}

impl ChatOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict advertised tools
    pub fn with_tools<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Identity of the model behind a chat client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatClientMetadata {
    /// e.g. "azure-openai"
    pub provider_name: String,
    /// Model or deployment
    pub model: String,
}
