//! Page-load wiring.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::chat::{ChatClient, ChatTransport};
use crate::config::AppConfig;
use crate::dom::Page;
use crate::scheduler::Scheduler;
use crate::todo::TodoList;
use crate::typewriter::{TypewriterReport, TypewriterRenderer};

/// Components attached to a loaded page.
///
/// Each slot is filled only when the page carries that component's
/// elements; the components never talk to each other.
#[derive(Debug, Default)]
pub struct Widgets {
    pub typewriter: Option<TypewriterRenderer>,
    pub chat: Option<ChatClient>,
    pub todo: Option<TodoList>,
}

impl Widgets {
    pub fn is_empty(&self) -> bool {
        self.typewriter.is_none() && self.chat.is_none() && self.todo.is_none()
    }

    /// Start the mounted typewriter on the current runtime.
    ///
    /// Takes the renderer out of its slot, so a second call returns `None`.
    pub fn start_typewriter(
        &mut self,
        scheduler: Arc<dyn Scheduler>,
    ) -> Option<JoinHandle<TypewriterReport>> {
        self.typewriter.take().map(|renderer| renderer.spawn(scheduler))
    }
}

/// Attach every component whose elements exist on `page`.
///
/// Mounting does not need a runtime, so the typewriter is only bound here.
/// Call [`Widgets::start_typewriter`] from inside the runtime to begin the
/// reveal.
pub fn mount_all(page: &Page, config: &AppConfig, transport: Arc<dyn ChatTransport>) -> Widgets {
    let typewriter = TypewriterRenderer::mount(page, &config.typewriter);

    let chat = ChatClient::mount(page, transport, &config.chat)
        .inspect_err(|e| debug!(name: "widgets.chat.skipped", reason = %e, "Chat not mounted"))
        .ok();

    let todo = TodoList::mount(page)
        .inspect_err(|e| debug!(name: "widgets.todo.skipped", reason = %e, "To-do list not mounted"))
        .ok();

    let widgets = Widgets {
        typewriter,
        chat,
        todo,
    };
    info!(
        name: "widgets.mounted",
        typewriter = widgets.typewriter.is_some(),
        chat = widgets.chat.is_some(),
        todo = widgets.todo.is_some(),
        "Page widgets mounted"
    );
    widgets
}
