//! In-memory document tree.

use std::collections::{BTreeMap, HashMap};

use crate::markup;

/// Handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single element.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    class_name: String,
    dataset: BTreeMap<String, String>,
    inner_html: String,
    value: String,
    children: Vec<NodeId>,
    scroll_top: usize,
}

impl Element {
    /// Tag name (lowercase).
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Space separated class list.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

/// Element arena plus the document cookie string.
///
/// Elements are never removed, so a [`NodeId`] stays valid for the life of
/// the document. Accessors taking an unknown id return empty values.
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Element>,
    by_id: HashMap<String, NodeId>,
    cookie: String,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            tag: tag.to_ascii_lowercase(),
            ..Element::default()
        });
        id
    }

    /// Create an element registered under `element_id`.
    ///
    /// A later element with the same identifier shadows the earlier one for
    /// [`Document::get_element_by_id`].
    pub fn create_element_with_id(&mut self, tag: &str, element_id: &str) -> NodeId {
        let node = self.create_element(tag);
        self.by_id.insert(element_id.to_string(), node);
        node
    }

    /// Look an element up by identifier.
    #[must_use]
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.by_id.get(element_id).copied()
    }

    /// Borrow an element.
    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    /// Append `child` to `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if child.0 < self.nodes.len() {
            if let Some(el) = self.nodes.get_mut(parent.0) {
                el.children.push(child);
            }
        }
    }

    /// Children of `node` in insertion order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|el| el.children.as_slice())
            .unwrap_or_default()
    }

    /// Set the class list.
    pub fn set_class_name(&mut self, node: NodeId, class_name: impl Into<String>) {
        if let Some(el) = self.nodes.get_mut(node.0) {
            el.class_name = class_name.into();
        }
    }

    /// Read a `data-*` attribute (`key` without the prefix).
    #[must_use]
    pub fn dataset(&self, node: NodeId, key: &str) -> Option<&str> {
        self.nodes.get(node.0)?.dataset.get(key).map(String::as_str)
    }

    /// Set a `data-*` attribute.
    pub fn set_dataset(&mut self, node: NodeId, key: &str, value: impl Into<String>) {
        if let Some(el) = self.nodes.get_mut(node.0) {
            el.dataset.insert(key.to_string(), value.into());
        }
    }

    /// Own markup of the element, without its children.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map_or("", |el| el.inner_html.as_str())
    }

    /// Replace the element's markup.
    pub fn set_inner_html(&mut self, node: NodeId, html: impl Into<String>) {
        if let Some(el) = self.nodes.get_mut(node.0) {
            el.inner_html = html.into();
        }
    }

    /// Append markup to the element (`innerHTML +=`).
    pub fn append_html(&mut self, node: NodeId, html: &str) {
        if let Some(el) = self.nodes.get_mut(node.0) {
            el.inner_html.push_str(html);
        }
    }

    /// Replace the element's content with escaped text.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.set_inner_html(node, markup::escape_html(text));
    }

    /// Rendered text of the element and its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = markup::to_plain_text(self.inner_html(node));
        for child in self.children(node) {
            out.push_str(&self.text_content(*child));
        }
        out
    }

    /// Current form value.
    #[must_use]
    pub fn value(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map_or("", |el| el.value.as_str())
    }

    /// Set the form value.
    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        if let Some(el) = self.nodes.get_mut(node.0) {
            el.value = value.into();
        }
    }

    /// Scrollable height, measured in child rows.
    #[must_use]
    pub fn scroll_height(&self, node: NodeId) -> usize {
        self.children(node).len()
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_top(&self, node: NodeId) -> usize {
        self.nodes.get(node.0).map_or(0, |el| el.scroll_top)
    }

    /// Scroll so the last child is visible.
    pub fn scroll_to_bottom(&mut self, node: NodeId) {
        let height = self.scroll_height(node);
        if let Some(el) = self.nodes.get_mut(node.0) {
            el.scroll_top = height;
        }
    }

    /// The `document.cookie` string.
    #[must_use]
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// Replace the cookie string.
    pub fn set_cookie(&mut self, cookie: impl Into<String>) {
        self.cookie = cookie.into();
    }
}
