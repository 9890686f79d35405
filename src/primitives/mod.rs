//! Primitives - Component building blocks.
//!
//! - [`element`] - A plain element rendered in place
//! - [`text`] - A text node with static or reactive content
//! - [`show`] - Conditional rendering
//! - [`render_into`] - Render children under an arbitrary node
//! - [`portal`] - Render children into a container elsewhere in the document
//! - [`MountGate`] - Defer work until the pass is known to run on a live document
//!
//! # Architecture
//!
//! Components are plain functions taking a [`Cx`](crate::engine::Cx) and
//! returning a [`Cleanup`]. Each component:
//! 1. Reads its parent (and any tree-scoped values) from the `Cx`
//! 2. Creates its nodes in the parent's document
//! 3. Hands a refined `Cx` to its children
//! 4. Returns a cleanup that undoes all of the above
//!
//! # Reactivity
//!
//! Props can be:
//! - Static values: `"portal".into()`
//! - Signals: `class_signal.into()` (stays connected!)
//! - Getters: `PropValue::Getter(Rc::new(|| compute_class()))`
//!
//! Pass signals directly - extracting the value first breaks reactivity.

mod control_flow;
mod element;
mod mount_gate;
mod portal;
mod text;
mod types;

pub use control_flow::{render_into, show};
pub use element::element;
pub use mount_gate::MountGate;
pub use portal::{attach, create_container, detach, portal, resolve_mount_target, PortalHandle, PortalState};
pub use text::text;
pub use types::*;
