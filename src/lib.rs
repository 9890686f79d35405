//! # spark-portal
//!
//! Portals for reactive UI trees: render a subtree somewhere else in the
//! document while it keeps its place in the component tree.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! Components are functions that receive a render context ([`Cx`]) from their
//! parent, create nodes in a live [`Document`], and return a [`Cleanup`].
//! Work that must wait for the render pass to commit is queued on the
//! scheduler and run by [`Root::tick`]:
//!
//! ```text
//! render → layout effects (portals attach) → post-commit effects (gates open)
//! ```
//!
//! A [`portal`] renders nothing until its [`MountGate`] confirms a live
//! document, then attaches its own container under the enclosing portal's
//! container, an explicit [`NodeRef`], or `<body>`, in that order.
//!
//! ## Modules
//!
//! - [`types`] - Node ids, node flags, defaults
//! - [`dom`] - Document, Node, NodeRef
//! - [`engine`] - Scheduler, environment, render context, effect ownership
//! - [`primitives`] - element, text, show, render_into, portal
//! - [`pipeline`] - Root mounting and ticking
//!
//! ## Logging
//!
//! Lifecycle transitions are reported through [`tracing`] at `debug` level and
//! scheduler activity at `trace`. Anomalies that are tolerated rather than
//! surfaced (a refused attach, a missing mount target) are logged at `warn`.
//! No subscriber is installed by this crate.

pub mod dom;
pub mod engine;
pub mod pipeline;
pub mod primitives;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use dom::{Document, DomError, Node, NodeRef};

pub use engine::{
    detached, flush, owned_effect, pending_jobs, queue_effect, queue_layout_effect, reset_scheduler,
    BrowserEnvironment, Cx, Environment, NestingContext, ServerEnvironment,
};

pub use pipeline::{mount, unmount, Root};

pub use primitives::{
    attach, children, create_container, detach, element, empty_children, noop, portal,
    render_into, resolve_mount_target, show, text, Children, Cleanup, ElementProps, MountGate,
    PortalHandle, PortalProps, PortalState, PropValue,
};
