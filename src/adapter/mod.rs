//! Bridge from the generic [`ChatClient`](crate::chat::ChatClient) contract
//! to the [`Kernel`](crate::kernel::Kernel).
//!
//! Chat messages are translated to engine messages by [`roles`], the kernel
//! resolves tool calls, and only the assistant's text comes back out.

mod client;
pub mod roles;

pub use client::KernelChatClient;
pub use roles::{from_author_role, to_author_role, to_chat_history};
