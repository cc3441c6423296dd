//! In-memory page model.
//!
//! The components never reach for global element handles. They receive a
//! [`Page`], resolve the identifiers they need once at mount time, and keep
//! the resulting [`NodeId`]s in their own context structs.
//!
//! # Structure
//!
//! - [`Document`]: element arena with markup, form values and the cookie string
//! - [`Page`]: shared, clonable handle to a document
//! - [`get_cookie`]: `document.cookie` lookup used for the CSRF header

mod cookie;
mod document;

pub use cookie::get_cookie;
pub use document::{Document, Element, NodeId};

use std::sync::{Arc, PoisonError, RwLock};

/// Shared handle to a [`Document`].
///
/// Clones refer to the same document. Lock scopes are kept to a single
/// closure call so no guard is ever held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct Page {
    inner: Arc<RwLock<Document>>,
}

impl Page {
    /// Wrap a document.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(RwLock::new(document)),
        }
    }

    /// Run `f` with shared access to the document.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` with exclusive access to the document.
    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Look an element up by identifier.
    #[must_use]
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.read(|doc| doc.get_element_by_id(element_id))
    }

    /// Rendered text of an element.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        self.read(|doc| doc.text_content(node))
    }

    /// Current form value of an element.
    #[must_use]
    pub fn value(&self, node: NodeId) -> String {
        self.read(|doc| doc.value(node).to_string())
    }

    /// Set the form value of an element.
    pub fn set_value(&self, node: NodeId, value: impl Into<String>) {
        self.write(|doc| doc.set_value(node, value));
    }

    /// Children of an element.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.read(|doc| doc.children(node).to_vec())
    }

    /// The `document.cookie` string.
    #[must_use]
    pub fn cookie(&self) -> String {
        self.read(|doc| doc.cookie().to_string())
    }
}

/// A form submission.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    /// Create a fresh, cancellable submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the browser's default navigation.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether [`SubmitEvent::prevent_default`] was called.
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
