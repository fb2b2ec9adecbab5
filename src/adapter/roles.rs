//! Translation between chat-contract messages and engine-native messages.

use crate::chat::{ChatError, ChatMessage, ChatRole};
use crate::provider::{InternalMessage, MessageContent, MessageRole};

/// Map a chat role to the engine's author role.
pub fn to_author_role(role: &ChatRole) -> Result<MessageRole, ChatError> {
    match role {
        ChatRole::System => Ok(MessageRole::System),
        ChatRole::User => Ok(MessageRole::User),
        ChatRole::Assistant => Ok(MessageRole::Assistant),
        ChatRole::Tool => Ok(MessageRole::Tool),
        ChatRole::Other(other) => Err(ChatError::UnmappedRole(other.clone())),
    }
}

/// Map an engine author role back to a chat role.
pub fn from_author_role(role: &MessageRole) -> ChatRole {
    match role {
        MessageRole::System => ChatRole::System,
        MessageRole::User => ChatRole::User,
        MessageRole::Assistant => ChatRole::Assistant,
        MessageRole::Tool => ChatRole::Tool,
    }
}

/// Translate a chat history in order. The first unmappable message aborts
/// the whole translation.
pub fn to_chat_history(history: &[ChatMessage]) -> Result<Vec<InternalMessage>, ChatError> {
    history.iter().map(to_internal_message).collect()
}

fn to_internal_message(message: &ChatMessage) -> Result<InternalMessage, ChatError> {
    Ok(InternalMessage {
        role: to_author_role(message.role())?,
        content: MessageContent::Text(message.text().to_string()),
        metadata: Default::default(),
        tool_call_id: None,
        name: None,
    })
}
