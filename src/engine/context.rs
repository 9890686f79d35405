//! Render Context - Tree-scoped values handed from parent to children.
//!
//! Every component receives a [`Cx`] from its parent and passes a (possibly
//! refined) copy to its own children. Nothing here is global: a value set by
//! a component is visible to its descendants only, because only they receive
//! the refined `Cx`.
//!
//! # Pattern: Refine, don't mutate
//!
//! ```ignore
//! // A container renders its children under itself
//! let child_cx = cx.with_parent(node.clone());
//! let cleanup = children(&child_cx);
//!
//! // A portal additionally announces its container to nested portals
//! let child_cx = cx.with_nesting(NestingContext::within(container.clone()));
//! ```

use std::fmt;
use std::rc::Rc;

use crate::dom::Node;
use super::environment::Environment;

// =============================================================================
// Nesting Context
// =============================================================================

/// The nearest enclosing portal's container, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NestingContext {
    /// Container of the enclosing portal. `None` outside every portal.
    pub parent_portal_node: Option<Node>,
}

impl NestingContext {
    /// Context at the tree root (no enclosing portal).
    pub fn root() -> Self {
        Self::default()
    }

    /// Context seen by the content of a portal rendering into `container`.
    pub fn within(container: Node) -> Self {
        Self { parent_portal_node: Some(container) }
    }
}

// =============================================================================
// Cx
// =============================================================================

/// Render context passed down the component tree.
#[derive(Clone)]
pub struct Cx {
    parent: Option<Node>,
    nesting: NestingContext,
    environment: Rc<dyn Environment>,
}

impl Cx {
    /// Context for the top of a tree rendering under `parent`.
    pub fn new(environment: Rc<dyn Environment>, parent: Option<Node>) -> Self {
        Self {
            parent,
            nesting: NestingContext::root(),
            environment,
        }
    }

    /// Node that in-place children attach to.
    pub fn parent(&self) -> Option<&Node> {
        self.parent.as_ref()
    }

    pub fn nesting(&self) -> &NestingContext {
        &self.nesting
    }

    pub fn environment(&self) -> &Rc<dyn Environment> {
        &self.environment
    }

    /// Same context, children attach under `parent`.
    pub fn with_parent(&self, parent: Node) -> Self {
        Self {
            parent: Some(parent),
            ..self.clone()
        }
    }

    /// Same context with a new nesting value for the subtree.
    pub fn with_nesting(&self, nesting: NestingContext) -> Self {
        Self {
            nesting,
            ..self.clone()
        }
    }
}

impl fmt::Debug for Cx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cx")
            .field("parent", &self.parent)
            .field("nesting", &self.nesting)
            .field("can_use_dom", &self.environment.can_use_dom())
            .finish()
    }
}
