//! Chat widget: input field, transcript and the send action.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use super::message::{ChatMessage, ChatRequest, ChatRole, ServerReply};
use super::transport::ChatTransport;
use crate::config::ChatConfig;
use crate::dom::{NodeId, Page, get_cookie};
use crate::error::{Error, Result};
use crate::markup::MarkupPolicy;

/// Identifier of the message input.
pub const INPUT_ID: &str = "chat-input";

/// Identifier of the transcript container.
pub const CHAT_BOX_ID: &str = "chat-box";

/// Shown before the reply when the server flags the question as off-topic.
pub const OFF_TOPIC_WARNING: &str = "⚠️ Схоже, це питання не про баскетбол";

/// Shown when the request or its response fails.
pub const SEND_FAILED: &str = "Помилка відправки повідомлення";

/// Context summary the server reports for a conversation with no history.
pub const NEW_CONVERSATION: &str = "Нова розмова";

/// What a call to [`ChatClient::send`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was blank; nothing was sent or rendered.
    Skipped,
    /// The reply was rendered.
    Replied { relevant: bool },
    /// The error message was rendered.
    Failed,
    /// A newer send started first; the result was dropped.
    Superseded,
}

/// Page handles the chat widget reads and writes.
#[derive(Debug, Clone)]
pub struct ChatContext {
    page: Page,
    input: NodeId,
    chat_box: NodeId,
}

impl ChatContext {
    /// Resolve `#chat-input` and `#chat-box` on `page`.
    pub fn resolve(page: &Page) -> Result<Self> {
        let (input, chat_box) = page.read(|doc| {
            let input = doc
                .get_element_by_id(INPUT_ID)
                .ok_or_else(|| Error::MissingElement(INPUT_ID.to_string()))?;
            let chat_box = doc
                .get_element_by_id(CHAT_BOX_ID)
                .ok_or_else(|| Error::MissingElement(CHAT_BOX_ID.to_string()))?;
            Ok::<_, Error>((input, chat_box))
        })?;
        Ok(Self {
            page: page.clone(),
            input,
            chat_box,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn chat_box(&self) -> NodeId {
        self.chat_box
    }
}

/// The chat widget.
///
/// Clones share the transport and the request sequence, so a clone can be
/// moved into a spawned task while another send is in flight.
#[derive(Debug, Clone)]
pub struct ChatClient {
    context: ChatContext,
    transport: Arc<dyn ChatTransport>,
    markup: MarkupPolicy,
    csrf_cookie: String,
    discard_stale_replies: bool,
    sequence: Arc<AtomicU64>,
}

impl ChatClient {
    /// Attach to the chat elements of `page`.
    pub fn mount(
        page: &Page,
        transport: Arc<dyn ChatTransport>,
        config: &ChatConfig,
    ) -> Result<Self> {
        Ok(Self::new(ChatContext::resolve(page)?, transport, config))
    }

    pub fn new(context: ChatContext, transport: Arc<dyn ChatTransport>, config: &ChatConfig) -> Self {
        Self {
            context,
            transport,
            markup: config.markup,
            csrf_cookie: config.csrf_cookie.clone(),
            discard_stale_replies: config.discard_stale_replies,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn context(&self) -> &ChatContext {
        &self.context
    }

    /// Send the current input.
    ///
    /// Never fails: transport and decoding errors are rendered as a system
    /// message. The user message stays in the transcript either way.
    pub async fn send(&self) -> SendOutcome {
        let page = &self.context.page;
        let text = page.value(self.context.input).trim().to_string();
        if text.is_empty() {
            return SendOutcome::Skipped;
        }

        self.append_message(&ChatMessage::user(text.as_str()));
        page.set_value(self.context.input, "");

        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let csrf_token = get_cookie(&page.cookie(), &self.csrf_cookie);
        if csrf_token.is_none() {
            debug!(name: "chat.csrf.missing", cookie = %self.csrf_cookie, "CSRF cookie not set");
        }

        info!(name: "chat.send.started", seq, chars = text.chars().count(), "Sending chat message");
        let request = ChatRequest { message: text };
        let result = self.transport.send(&request, csrf_token.as_deref()).await;

        if self.discard_stale_replies && self.sequence.load(Ordering::SeqCst) != seq {
            debug!(name: "chat.reply.superseded", seq, "Dropping result of superseded send");
            return SendOutcome::Superseded;
        }

        match result {
            Ok(reply) => {
                log_diagnostics(seq, &reply);
                let relevant = reply.relevant();
                if !relevant {
                    self.append_message(&ChatMessage::system(OFF_TOPIC_WARNING));
                }
                self.append_message(&ChatMessage::assistant(reply.response));
                SendOutcome::Replied { relevant }
            }
            Err(e) => {
                warn!(name: "chat.send.failed", seq, error = %e, "Chat request failed");
                self.append_message(&ChatMessage::system(SEND_FAILED));
                SendOutcome::Failed
            }
        }
    }

    /// Render `message` at the end of the transcript and scroll to it.
    pub fn append_message(&self, message: &ChatMessage) -> NodeId {
        let html = self.markup.render(&message.text);
        let chat_box = self.context.chat_box;
        self.context.page.write(|doc| {
            let div = doc.create_element("div");
            doc.set_class_name(div, format!("message {}", message.role));
            doc.set_inner_html(div, html);
            doc.append_child(chat_box, div);
            doc.scroll_to_bottom(chat_box);
            div
        })
    }

    /// Messages currently rendered in the transcript.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.context.page.read(|doc| {
            doc.children(self.context.chat_box)
                .iter()
                .filter_map(|node| {
                    let role = ChatRole::from_class_name(doc.element(*node)?.class_name())?;
                    Some(ChatMessage::new(role, doc.text_content(*node)))
                })
                .collect()
        })
    }
}

fn log_diagnostics(seq: u64, reply: &ServerReply) {
    debug!(
        name: "chat.reply.received",
        seq,
        is_relevant = ?reply.is_relevant,
        confidence = ?reply.confidence,
        context_summary = ?reply.context_summary,
        "Chat reply received"
    );
    if let Some(summary) = reply
        .context_summary
        .as_deref()
        .filter(|s| !s.is_empty() && *s != NEW_CONVERSATION)
    {
        info!(name: "chat.reply.context", seq, summary, "Previously discussed");
    }
}
