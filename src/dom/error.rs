//! Errors raised by document tree mutations.

use thiserror::Error;

/// Why a tree mutation was refused.
///
/// These mirror the DOM exceptions a browser would throw for the same calls.
/// The primitives in this crate never surface them to component authors;
/// they log the failure and leave the tree untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The child was created by a different document than the parent.
    #[error("node belongs to a different document")]
    WrongDocument,

    /// The insertion would break the tree shape.
    #[error("hierarchy request refused: {0}")]
    HierarchyRequest(&'static str),

    /// The node passed to a removal is not a child of the parent.
    #[error("node is not a child of this parent")]
    NotFound,

    /// One of the nodes was released and its handle is stale.
    #[error("node has been released")]
    Released,
}
