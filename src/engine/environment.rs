//! Environment - What the current render pass is allowed to touch.
//!
//! A render pass either runs against a live, mutable document (client) or
//! produces markup ahead of time with no live document at all (pre-render).
//! Components that mutate the document outside their own subtree, like
//! portals, ask the environment before doing so.

use crate::dom::{Document, Node};

/// Host capabilities consulted by the mount gate and the portal.
pub trait Environment {
    /// Whether a live document can be mutated in this pass.
    fn can_use_dom(&self) -> bool;

    /// Fallback mount target when neither an enclosing portal nor an explicit
    /// container is available.
    fn default_root(&self) -> Option<Node>;
}

// =============================================================================
// Browser (client pass)
// =============================================================================

/// A client pass with a live document.
#[derive(Clone, Debug)]
pub struct BrowserEnvironment {
    document: Document,
}

impl BrowserEnvironment {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Environment for BrowserEnvironment {
    fn can_use_dom(&self) -> bool {
        true
    }

    fn default_root(&self) -> Option<Node> {
        Some(self.document.body())
    }
}

// =============================================================================
// Server (pre-render pass)
// =============================================================================

/// A pre-render pass. There is no live document to mutate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerEnvironment;

impl Environment for ServerEnvironment {
    fn can_use_dom(&self) -> bool {
        false
    }

    fn default_root(&self) -> Option<Node> {
        None
    }
}
