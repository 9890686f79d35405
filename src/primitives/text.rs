//! Text Primitive - Display text content.
//!
//! A text node rendered in place. Content can be a static string, signal, or
//! getter; reactive content is kept in sync by an effect that lives as long
//! as the component.
//!
//! # Example
//!
//! ```ignore
//! // Static text
//! text(cx, "Hello, World!");
//!
//! // Reactive text
//! let count = signal(0);
//! let count_clone = count.clone();
//! text(cx, PropValue::Getter(Rc::new(move || format!("Count: {}", count_clone.get()))));
//!
//! // Update count - text updates automatically
//! count.set(42);
//! ```

use tracing::warn;

use crate::engine::{owned_effect, Cx};
use crate::types::NodeFlags;
use super::types::{Cleanup, PropValue, noop};

/// Create a text node under the current parent.
///
/// Returns a cleanup function that stops content tracking and releases the node.
pub fn text(cx: &Cx, content: impl Into<PropValue<String>>) -> Cleanup {
    let Some(parent) = cx.parent().cloned() else {
        warn!("text rendered without a parent, skipping");
        return noop();
    };

    let content = content.into();
    let node = parent.owner_document().create_text(&content.get());
    node.insert_flags(NodeFlags::RENDERED);

    if let Err(error) = parent.append_child(&node) {
        warn!(%error, "failed to attach text");
        return noop();
    }

    // Static content never changes, no need to track it
    let stop_tracking: Option<Cleanup> = if content.is_reactive() {
        let target = node.clone();
        Some(owned_effect(move || {
            target.set_text(&content.get());
        }))
    } else {
        None
    };

    Box::new(move || {
        if let Some(stop) = stop_tracking {
            stop();
        }
        node.release();
    })
}
