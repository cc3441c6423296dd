//! Documents shaped like the pages the components are written for.

use crate::chat;
use crate::dom::{Document, Page};
use crate::todo;
use crate::typewriter;

/// Landing page: the typewriter target carrying `text`.
pub fn home(text: &str) -> Page {
    let mut doc = Document::new();
    let el = doc.create_element_with_id("p", typewriter::TARGET_ID);
    doc.set_dataset(el, typewriter::TEXT_KEY, text);
    Page::new(doc)
}

/// Chat page with the given `document.cookie`.
pub fn chat(cookie: &str) -> Page {
    let mut doc = Document::new();
    doc.create_element_with_id("div", chat::CHAT_BOX_ID);
    doc.create_element_with_id("input", chat::INPUT_ID);
    doc.set_cookie(cookie);
    Page::new(doc)
}

/// To-do page.
pub fn todo() -> Page {
    let mut doc = Document::new();
    let form = doc.create_element_with_id("form", todo::FORM_ID);
    let input = doc.create_element_with_id("input", todo::INPUT_ID);
    doc.append_child(form, input);
    doc.create_element_with_id("ul", todo::LIST_ID);
    Page::new(doc)
}
