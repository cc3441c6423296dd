//! To-do list editor.
//!
//! On submission the input value is appended verbatim as a new `li`, with no
//! trimming and no emptiness check, and the input is cleared.

use tracing::debug;

use crate::dom::{NodeId, Page, SubmitEvent};
use crate::error::{Error, Result};

pub const FORM_ID: &str = "todo-form";
pub const INPUT_ID: &str = "todo-input";
pub const LIST_ID: &str = "todo-list";

/// Page handles the editor reads and writes.
#[derive(Debug, Clone)]
pub struct TodoContext {
    page: Page,
    form: NodeId,
    input: NodeId,
    list: NodeId,
}

impl TodoContext {
    pub fn resolve(page: &Page) -> Result<Self> {
        let lookup = |id: &str| {
            page.get_element_by_id(id)
                .ok_or_else(|| Error::MissingElement(id.to_string()))
        };
        Ok(Self {
            page: page.clone(),
            form: lookup(FORM_ID)?,
            input: lookup(INPUT_ID)?,
            list: lookup(LIST_ID)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TodoList {
    context: TodoContext,
}

impl TodoList {
    pub fn mount(page: &Page) -> Result<Self> {
        Ok(Self {
            context: TodoContext::resolve(page)?,
        })
    }

    pub fn form(&self) -> NodeId {
        self.context.form
    }

    pub fn input(&self) -> NodeId {
        self.context.input
    }

    pub fn list(&self) -> NodeId {
        self.context.list
    }

    /// Handle a submission of `#todo-form`. Returns the new entry.
    pub fn submit(&self, event: &mut SubmitEvent) -> NodeId {
        event.prevent_default();

        let TodoContext {
            page, input, list, ..
        } = &self.context;
        let (input, list) = (*input, *list);
        page.write(|doc| {
            let text = doc.value(input).to_string();
            doc.set_value(input, "");

            let li = doc.create_element("li");
            doc.set_text_content(li, &text);
            doc.append_child(list, li);
            debug!(name: "todo.item.added", chars = text.chars().count(), "To-do item added");
            li
        })
    }

    /// Text of every entry, oldest first.
    pub fn items(&self) -> Vec<String> {
        let page = &self.context.page;
        page.children(self.context.list)
            .into_iter()
            .map(|li| page.text_content(li))
            .collect()
    }
}
