//! Node - Handle to one node of a [`Document`].
//!
//! Tree operations follow DOM semantics:
//! - `append_child` moves the child if it already has a parent
//! - `remove_child` refuses nodes that are not direct children
//! - `contains` is an inclusive-descendant test
//!
//! All mutations are checked and return [`DomError`] instead of panicking.
//! A handle to a released node stays safe to use: queries answer as if the
//! node were empty and detached, mutations fail with [`DomError::Released`].

use std::fmt;

use crate::types::{NodeFlags, NodeId};
use super::document::{Document, NodeKind};
use super::error::DomError;

/// Handle to a node (document + slot).
#[derive(Clone)]
pub struct Node {
    doc: Document,
    id: NodeId,
}

impl Node {
    pub(crate) fn from_parts(doc: Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    /// Slot of this node inside its document.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The document that created this node.
    ///
    /// New nodes meant to live next to this one must be created through this
    /// document, not a global one, or insertion fails with
    /// [`DomError::WrongDocument`].
    pub fn owner_document(&self) -> Document {
        self.doc.clone()
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Tag name for elements and frames, `None` for text nodes.
    pub fn tag_name(&self) -> Option<String> {
        self.doc
            .with_node(self.id, |data| match &data.kind {
                NodeKind::Element { tag } => Some(tag.clone()),
                NodeKind::Frame { .. } => Some("iframe".to_string()),
                NodeKind::Text(_) => None,
            })
            .flatten()
    }

    /// Whether this is a text node.
    pub fn is_text(&self) -> bool {
        self.doc
            .with_node(self.id, |data| matches!(data.kind, NodeKind::Text(_)))
            .unwrap_or(false)
    }

    /// Text content of a text node, `None` for elements.
    pub fn text(&self) -> Option<String> {
        self.doc
            .with_node(self.id, |data| match &data.kind {
                NodeKind::Text(text) => Some(text.clone()),
                _ => None,
            })
            .flatten()
    }

    /// Replace the content of a text node. Ignored on elements.
    pub fn set_text(&self, text: &str) {
        self.doc.with_node_mut(self.id, |data| {
            if let NodeKind::Text(current) = &mut data.kind {
                current.clear();
                current.push_str(text);
            }
        });
    }

    /// The embedded document of a frame element.
    pub fn content_document(&self) -> Option<Document> {
        self.doc
            .with_node(self.id, |data| match &data.kind {
                NodeKind::Frame { content } => Some(content.clone()),
                _ => None,
            })
            .flatten()
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = self.text() {
            out.push_str(&text);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }

    // =========================================================================
    // Class & Flags
    // =========================================================================

    /// The raw `class` attribute.
    pub fn class_name(&self) -> String {
        self.doc
            .with_node(self.id, |data| data.class_name.clone())
            .unwrap_or_default()
    }

    pub fn set_class_name(&self, class_name: &str) {
        self.doc.with_node_mut(self.id, |data| {
            data.class_name.clear();
            data.class_name.push_str(class_name);
        });
    }

    /// Whether `class` appears among the whitespace-separated class names.
    pub fn has_class(&self, class: &str) -> bool {
        self.doc
            .with_node(self.id, |data| {
                data.class_name.split_ascii_whitespace().any(|c| c == class)
            })
            .unwrap_or(false)
    }

    pub fn flags(&self) -> NodeFlags {
        self.doc.with_node(self.id, |data| data.flags).unwrap_or_default()
    }

    pub fn insert_flags(&self, flags: NodeFlags) {
        self.doc.with_node_mut(self.id, |data| data.flags.insert(flags));
    }

    // =========================================================================
    // Structure Queries
    // =========================================================================

    pub fn parent(&self) -> Option<Node> {
        self.doc
            .with_node(self.id, |data| data.parent)
            .flatten()
            .map(|id| Node::from_parts(self.doc.clone(), id))
    }

    /// Children in document order.
    pub fn children(&self) -> Vec<Node> {
        self.doc
            .with_node(self.id, |data| data.children.clone())
            .unwrap_or_default()
            .into_iter()
            .map(|id| Node::from_parts(self.doc.clone(), id))
            .collect()
    }

    /// Children that are not text nodes.
    pub fn element_children(&self) -> Vec<Node> {
        self.children().into_iter().filter(|c| !c.is_text()).collect()
    }

    pub fn child_count(&self) -> usize {
        self.doc.with_node(self.id, |data| data.children.len()).unwrap_or(0)
    }

    pub fn last_child(&self) -> Option<Node> {
        self.doc
            .with_node(self.id, |data| data.children.last().copied())
            .flatten()
            .map(|id| Node::from_parts(self.doc.clone(), id))
    }

    /// Whether `child` is currently a direct child of this node.
    pub fn has_child(&self, child: &Node) -> bool {
        self.doc.ptr_eq(&child.doc)
            && child.doc.with_node(child.id, |data| data.parent).flatten() == Some(self.id)
    }

    /// Whether `other` is this node or one of its descendants.
    pub fn contains(&self, other: &Node) -> bool {
        if !self.doc.ptr_eq(&other.doc) {
            return false;
        }
        let mut cursor = Some(other.id);
        while let Some(id) = cursor {
            if id == self.id {
                return true;
            }
            cursor = self.doc.with_node(id, |data| data.parent).flatten();
        }
        false
    }

    /// Whether this node has not been released.
    pub fn is_alive(&self) -> bool {
        self.doc.with_node(self.id, |_| ()).is_some()
    }

    /// Whether this node hangs off the document's `<html>` element.
    pub fn is_connected(&self) -> bool {
        self.doc.document_element().contains(self)
    }

    /// All descendants (excluding self) carrying every flag in `flags`.
    pub fn descendants_with(&self, flags: NodeFlags) -> Vec<Node> {
        let mut found = Vec::new();
        let mut stack: Vec<Node> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.flags().contains(flags) {
                found.push(node.clone());
            }
            stack.extend(node.children().into_iter().rev());
        }
        found
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append `child` as the last child of this node.
    ///
    /// A child that already has a parent is moved.
    pub fn append_child(&self, child: &Node) -> Result<(), DomError> {
        if !self.doc.ptr_eq(&child.doc) {
            return Err(DomError::WrongDocument);
        }
        if !self.is_alive() || !child.is_alive() {
            return Err(DomError::Released);
        }
        if self.is_text() {
            return Err(DomError::HierarchyRequest("text nodes cannot have children"));
        }
        if child.contains(self) {
            return Err(DomError::HierarchyRequest("node cannot be inserted into its own subtree"));
        }

        let parent_id = self.id;
        let child_id = child.id;
        self.doc.with_arena_mut(|arena| {
            let old_parent = arena.get_mut(child_id).and_then(|data| data.parent.take());
            if let Some(old) = old_parent.and_then(|id| arena.get_mut(id)) {
                old.children.retain(|&c| c != child_id);
            }
            if let Some(data) = arena.get_mut(child_id) {
                data.parent = Some(parent_id);
            }
            if let Some(data) = arena.get_mut(parent_id) {
                data.children.push(child_id);
            }
        });
        Ok(())
    }

    /// Remove a direct child, handing it back detached.
    pub fn remove_child(&self, child: &Node) -> Result<Node, DomError> {
        if !self.has_child(child) {
            return Err(DomError::NotFound);
        }

        let parent_id = self.id;
        let child_id = child.id;
        self.doc.with_arena_mut(|arena| {
            if let Some(data) = arena.get_mut(parent_id) {
                data.children.retain(|&c| c != child_id);
            }
            if let Some(data) = arena.get_mut(child_id) {
                data.parent = None;
            }
        });
        Ok(child.clone())
    }

    /// Detach this node from its parent. Returns `false` if it had none.
    pub fn remove(&self) -> bool {
        match self.parent() {
            Some(parent) => parent.remove_child(self).is_ok(),
            None => false,
        }
    }

    /// Detach this node and free it together with its whole subtree.
    ///
    /// Every handle into the subtree goes stale and the slots are reused by
    /// later `create_*` calls. `<html>` and `<body>` are never released.
    /// Returns `false` if nothing was freed.
    pub fn release(&self) -> bool {
        if !self.is_alive() || self.doc.is_root_node(self.id) {
            return false;
        }
        self.remove();
        self.doc.free_subtree(self.id) > 0
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.doc.ptr_eq(&other.doc)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag_name() {
            Some(tag) => {
                let class = self.class_name();
                if class.is_empty() {
                    write!(f, "Node#{}<{}>", self.id.raw(), tag)
                } else {
                    write!(f, "Node#{}<{}.{}>", self.id.raw(), tag, class)
                }
            }
            None if !self.is_alive() => write!(f, "Node#{}(released)", self.id.raw()),
            None => write!(f, "Node#{}({:?})", self.id.raw(), self.text().unwrap_or_default()),
        }
    }
}
