//! Document - Arena of nodes owned by one document.
//!
//! Nodes are slots in a per-document arena, addressed by [`NodeId`]:
//! - Slot 0 is the `<html>` document element
//! - Slot 1 is `<body>`, the default mount root
//! - Every later slot is allocated by a `create_*` call
//!
//! Releasing a node ([`Node::release`]) frees its slot and the slots of its
//! whole subtree. Freed slots go on a free list and are reused with a bumped
//! generation, so a stale [`Node`] handle never aliases the node that took
//! its slot.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::types::{NodeFlags, NodeId};
use super::node::Node;

// =============================================================================
// Node Storage
// =============================================================================

/// What a node is.
#[derive(Clone)]
pub(crate) enum NodeKind {
    Element { tag: String },
    Text(String),
    /// An element hosting its own embedded document (iframe-like).
    Frame { content: Document },
}

/// Per-node record stored in the document arena.
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) class_name: String,
    pub(crate) flags: NodeFlags,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            class_name: String::new(),
            flags: NodeFlags::empty(),
        }
    }
}

/// Slot storage with generational ids.
pub(crate) struct Arena {
    slots: Vec<Option<NodeData>>,
    /// Last generation handed out per slot (kept across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl Arena {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    fn insert(&mut self, data: NodeData) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(data);
            NodeId::new(idx, generation)
        } else {
            self.slots.push(Some(data));
            self.generations.push(1);
            NodeId::new(self.slots.len() - 1, 1)
        }
    }

    pub(crate) fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&NodeData> {
        if self.generations.get(id.idx()) != Some(&id.generation()) {
            return None;
        }
        self.slots.get(id.idx())?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        if self.generations.get(id.idx()) != Some(&id.generation()) {
            return None;
        }
        self.slots.get_mut(id.idx())?.as_mut()
    }

    fn free(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.is_alive(id) {
            return None;
        }
        let data = self.slots[id.idx()].take();
        self.free_list.push(id.idx());
        data
    }

    fn live(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }
}

struct DocumentInner {
    arena: RefCell<Arena>,
    document_element: NodeId,
    body: NodeId,
}

// =============================================================================
// Document
// =============================================================================

/// Handle to a live document.
///
/// Cloning is cheap and yields another handle to the same document. Two
/// handles compare equal only when they point at the same document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Document {
    /// Create a document holding `<html><body></body></html>`.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let html = arena.insert(NodeData::new(NodeKind::Element { tag: "html".into() }));
        let body = arena.insert(NodeData::new(NodeKind::Element { tag: "body".into() }));
        if let Some(data) = arena.get_mut(html) {
            data.children.push(body);
        }
        if let Some(data) = arena.get_mut(body) {
            data.parent = Some(html);
        }

        Self {
            inner: Rc::new(DocumentInner {
                arena: RefCell::new(arena),
                document_element: html,
                body,
            }),
        }
    }

    /// The `<body>` element. Portals fall back to it as their mount target.
    pub fn body(&self) -> Node {
        Node::from_parts(self.clone(), self.inner.body)
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> Node {
        Node::from_parts(self.clone(), self.inner.document_element)
    }

    /// Create a detached element owned by this document.
    pub fn create_element(&self, tag: &str) -> Node {
        self.allocate(NodeData::new(NodeKind::Element { tag: tag.to_string() }))
    }

    /// Create a detached text node owned by this document.
    pub fn create_text(&self, text: &str) -> Node {
        self.allocate(NodeData::new(NodeKind::Text(text.to_string())))
    }

    /// Create a detached frame element with a fresh embedded document.
    ///
    /// Reach the embedded document through [`Node::content_document`].
    pub fn create_frame(&self) -> Node {
        let mut data = NodeData::new(NodeKind::Frame { content: Document::new() });
        data.flags.insert(NodeFlags::FRAME);
        self.allocate(data)
    }

    /// Number of live nodes (attached or not). Released nodes do not count.
    pub fn node_count(&self) -> usize {
        self.inner.arena.borrow().live()
    }

    /// Number of slots the arena has grown to, live or free.
    pub fn slot_count(&self) -> usize {
        self.inner.arena.borrow().slots.len()
    }

    /// Whether two handles refer to the same document.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn allocate(&self, data: NodeData) -> Node {
        let id = self.inner.arena.borrow_mut().insert(data);
        Node::from_parts(self.clone(), id)
    }

    /// Whether `id` is one of the two nodes every document keeps.
    pub(crate) fn is_root_node(&self, id: NodeId) -> bool {
        id == self.inner.document_element || id == self.inner.body
    }

    // =========================================================================
    // Arena access (crate-internal)
    // =========================================================================

    /// Run `f` on a live node. `None` if the id is stale.
    pub(crate) fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        self.inner.arena.borrow().get(id).map(f)
    }

    pub(crate) fn with_node_mut<R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&mut NodeData) -> R,
    ) -> Option<R> {
        self.inner.arena.borrow_mut().get_mut(id).map(f)
    }

    pub(crate) fn with_arena_mut<R>(&self, f: impl FnOnce(&mut Arena) -> R) -> R {
        f(&mut self.inner.arena.borrow_mut())
    }

    /// Free `root` and every node below it. Returns how many slots were freed.
    ///
    /// The caller unlinks `root` from its parent first.
    pub(crate) fn free_subtree(&self, root: NodeId) -> usize {
        let freed = {
            let mut arena = self.inner.arena.borrow_mut();
            let mut freed = Vec::new();
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                if let Some(data) = arena.free(id) {
                    stack.extend(data.children.iter().copied());
                    freed.push(data);
                }
            }
            freed
        };
        // Dropped outside the borrow; frames drop their embedded documents here
        freed.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Document {}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arena = self.inner.arena.borrow();
        f.debug_struct("Document")
            .field("ptr", &Rc::as_ptr(&self.inner))
            .field("nodes_alive", &arena.live())
            .field("free_list", &arena.free_list.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_shape() {
        let doc = Document::new();
        let html = doc.document_element();
        let body = doc.body();

        assert_eq!(html.tag_name().as_deref(), Some("html"));
        assert_eq!(body.tag_name().as_deref(), Some("body"));
        assert_eq!(body.parent(), Some(html.clone()));
        assert_eq!(html.children(), vec![body.clone()]);
        assert_eq!(body.child_count(), 0);
        assert_eq!(doc.node_count(), 2);
    }

    #[test]
    fn test_created_nodes_are_detached() {
        let doc = Document::new();
        let div = doc.create_element("div");
        let txt = doc.create_text("hi");

        assert_eq!(div.parent(), None);
        assert_eq!(txt.parent(), None);
        assert_eq!(txt.text().as_deref(), Some("hi"));
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn test_documents_are_distinct() {
        let a = Document::new();
        let b = Document::new();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a.body(), b.body());
    }

    #[test]
    fn test_frame_has_own_document() {
        let doc = Document::new();
        let frame = doc.create_frame();

        let inner = frame.content_document().expect("frame has a content document");
        assert!(!inner.ptr_eq(&doc));
        assert!(frame.flags().contains(NodeFlags::FRAME));
        assert_eq!(frame.tag_name().as_deref(), Some("iframe"));
    }

    #[test]
    fn test_released_slots_are_reused() {
        let doc = Document::new();
        let first = doc.create_element("div");
        let slot = first.id().raw();

        assert!(first.release());
        assert_eq!(doc.node_count(), 2);

        let second = doc.create_element("p");
        assert_eq!(second.id().raw(), slot, "freed slot reused");
        assert_eq!(second.id().generation(), first.id().generation() + 1);
        assert_ne!(first, second, "stale handle never aliases the new node");
        assert!(!first.is_alive());
        assert_eq!(first.tag_name(), None);
        assert_eq!(doc.slot_count(), 3);
    }

    #[test]
    fn test_release_frees_whole_subtree() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        let leaf = doc.create_text("x");
        doc.body().append_child(&outer).unwrap();
        outer.append_child(&inner).unwrap();
        inner.append_child(&leaf).unwrap();
        assert_eq!(doc.node_count(), 5);

        assert!(outer.release());
        assert_eq!(doc.node_count(), 2);
        assert_eq!(doc.body().child_count(), 0);
        assert!(!leaf.is_alive());
    }

    #[test]
    fn test_repeated_create_release_stays_bounded() {
        let doc = Document::new();
        for _ in 0..1000 {
            let div = doc.create_element("div");
            div.append_child(&doc.create_text("hi")).unwrap();
            doc.body().append_child(&div).unwrap();
            div.release();
        }
        assert_eq!(doc.node_count(), 2);
        assert_eq!(doc.slot_count(), 4);
    }
}
