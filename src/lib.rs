//! Page Widgets
//!
//! Three independent page components over an in-memory page model: a
//! typewriter text reveal, a chat widget backed by `POST /chat/`, and a
//! to-do list editor.
//!
//! # Architecture
//!
//! - **Page model**: element arena shared through a clonable [`dom::Page`] handle
//! - **Components**: each resolves its element ids once into a context struct
//! - **Timing**: animation steps await an injected [`scheduler::Scheduler`]
//! - **Network**: the chat client talks through a [`chat::ChatTransport`]
//!
//! # Modules
//!
//! - [`typewriter`]: incremental text reveal
//! - [`chat`]: chat send action, transcript and HTTP transport
//! - [`todo`]: to-do list editor
//! - [`markup`]: sanitized vs raw markup insertion
//! - [`widgets`]: attach whatever components a loaded page supports

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod chat;
pub mod config;
pub mod dom;
pub mod error;
pub mod markup;
pub mod pages;
pub mod scheduler;
pub mod telemetry;
pub mod todo;
pub mod typewriter;
pub mod widgets;

pub use error::{Error, Result};
