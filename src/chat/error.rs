//! Error type for chat clients.

use thiserror::Error;

/// Errors returned by a [`ChatClient`](crate::chat::ChatClient).
#[derive(Debug, Error)]
pub enum ChatError {
    /// `send`/`stream` was called with no messages.
    #[error("chat history must not be empty")]
    EmptyHistory,

    /// A message carried a role the model cannot represent.
    #[error("chat role '{0}' has no model equivalent")]
    UnmappedRole(String),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// Failure reported by the model provider or the engine, unchanged.
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_is_transparent() {
        let err: ChatError = anyhow::anyhow!("API error 401 Unauthorized: bad key").into();
        assert_eq!(err.to_string(), "API error 401 Unauthorized: bad key");
        assert!(matches!(err, ChatError::Provider(_)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ChatError::UnmappedRole("critic".into()).to_string(),
            "chat role 'critic' has no model equivalent"
        );
        assert_eq!(ChatError::EmptyHistory.to_string(), "chat history must not be empty");
        assert_eq!(ChatError::Cancelled.to_string(), "request cancelled");
    }
}
