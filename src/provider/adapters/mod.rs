//! Adapters between the internal message/tool format and the OpenAI chat
//! completions wire format.

pub mod messages;
pub mod tools;

pub use messages::MessageAdapter;
pub use tools::ToolAdapter;
