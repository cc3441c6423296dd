//! Chat client.
//!
//! Turns the text in `#chat-input` into a `POST /chat/` exchange and renders
//! the outcome into `#chat-box`.
//!
//! # Structure
//!
//! - [`ChatClient`]: the send action and transcript rendering
//! - [`ChatTransport`]: network seam, with [`HttpTransport`] as the reqwest implementation
//! - [`ServerReply`], [`ChatMessage`]: wire and transcript types

mod client;
mod message;
mod transport;

pub use client::{
    CHAT_BOX_ID, ChatClient, ChatContext, INPUT_ID, NEW_CONVERSATION, OFF_TOPIC_WARNING,
    SEND_FAILED, SendOutcome,
};
pub use message::{ChatMessage, ChatRequest, ChatRole, ServerReply};
pub use transport::{ChatTransport, HttpTransport};
