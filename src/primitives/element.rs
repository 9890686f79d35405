//! Element Primitive - A plain node rendered in place.
//!
//! Creates one element under the current parent, renders its children inside
//! it and releases it again on cleanup.
//!
//! # Example
//!
//! ```ignore
//! let cleanup = element(cx, ElementProps {
//!     tag: "section".into(),
//!     class_name: Some("card".into()),
//!     children: Some(children(|cx| text(cx, "Hello!"))),
//! });
//! ```

use tracing::warn;

use crate::engine::Cx;
use crate::types::NodeFlags;
use super::types::{Cleanup, ElementProps, noop};

/// Create an element under the current parent.
///
/// Returns a cleanup function that cleans up the children first, then
/// detaches the element and releases its slot (and anything still below it).
pub fn element(cx: &Cx, props: ElementProps) -> Cleanup {
    // 1. RESOLVE PARENT
    let Some(parent) = cx.parent().cloned() else {
        warn!(tag = %props.tag, "element rendered without a parent, skipping");
        return noop();
    };

    // 2. CREATE NODE - in the parent's own document
    let node = parent.owner_document().create_element(&props.tag);
    node.insert_flags(NodeFlags::RENDERED);
    if let Some(class_name) = &props.class_name {
        node.set_class_name(class_name);
    }

    // 3. ATTACH
    if let Err(error) = parent.append_child(&node) {
        warn!(%error, tag = %props.tag, "failed to attach element");
        return noop();
    }

    // 4. CHILDREN - rendered with this element as their parent
    let child_cleanup = props.children.map(|children| children(&cx.with_parent(node.clone())));

    Box::new(move || {
        if let Some(cleanup) = child_cleanup {
            cleanup();
        }
        node.release();
    })
}
