//! NodeRef - Reactive, externally owned reference to a node.

use std::fmt;

use spark_signals::{signal, Signal};

use super::node::Node;

/// A slot holding "the node I want portals to render into".
///
/// The current value lives in a signal, so a portal reading it from its
/// effect re-resolves its mount target whenever the reference is repointed.
#[derive(Clone)]
pub struct NodeRef {
    current: Signal<Option<Node>>,
}

impl NodeRef {
    /// An empty reference.
    pub fn new() -> Self {
        Self { current: signal(None) }
    }

    /// A reference already pointing at `node`.
    pub fn to(node: Node) -> Self {
        Self { current: signal(Some(node)) }
    }

    /// Current target (creates a reactive dependency inside effects).
    pub fn get(&self) -> Option<Node> {
        self.current.get()
    }

    pub fn set(&self, node: Node) {
        self.current.set(Some(node));
    }

    pub fn clear(&self) {
        self.current.set(None);
    }
}

impl Default for NodeRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_set_and_clear() {
        let doc = Document::new();
        let target = doc.create_element("aside");

        let node_ref = NodeRef::new();
        assert_eq!(node_ref.get(), None);

        node_ref.set(target.clone());
        assert_eq!(node_ref.get(), Some(target.clone()));

        let shared = node_ref.clone();
        shared.clear();
        assert_eq!(node_ref.get(), None, "clones share the same slot");
    }
}
