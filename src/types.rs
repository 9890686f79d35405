//! Core types shared by the document model and the portal primitives.

// =============================================================================
// Defaults
// =============================================================================

/// Class applied to a portal container when the caller does not pass one.
pub const DEFAULT_PORTAL_CLASS: &str = "portal";

/// Tag name of every portal container.
pub const CONTAINER_TAG: &str = "div";

// =============================================================================
// Node Identity
// =============================================================================

/// Identifier of a node inside its owner [`Document`](crate::dom::Document).
///
/// A slot index plus a generation counter. Releasing a node frees its slot;
/// the next node allocated there gets the next generation, so a stale id
/// never aliases the new node.
///
/// A `NodeId` is only meaningful together with the document that allocated it,
/// which is why the public API hands out [`Node`](crate::dom::Node) handles
/// (document + id) instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot number. Reused after the node is released.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Generation of the slot when this id was handed out. Starts at 1.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

// =============================================================================
// Node Flags
// =============================================================================

bitflags::bitflags! {
    /// Bookkeeping flags stored on every node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is a container created and owned by a portal.
        const PORTAL_CONTAINER = 0b0000_0001;
        /// Node was created by the element/text primitives.
        const RENDERED         = 0b0000_0010;
        /// Node is a frame element hosting an embedded document.
        const FRAME            = 0b0000_0100;
    }
}
