//! Portal Primitive - Render children somewhere else in the document.
//!
//! A portal owns one container element. The container is attached under a
//! mount target chosen by priority:
//!
//! 1. the container of the enclosing portal (from the nesting context),
//! 2. the node the caller's [`NodeRef`] currently points at,
//! 3. the environment's default root (`<body>`).
//!
//! Children are rendered into the container with the container announced as
//! the new nesting context, so portals nested inside the content attach under
//! it instead of all collapsing onto `<body>`.
//!
//! # Lifecycle
//!
//! ```text
//! Unready ──gate opens──▶ ReadyUnmounted ──layout flush──▶ Attached ──dispose──▶ Detached
//!                                                           │    ▲
//!                                                           └────┘ target or class changed:
//!                                                                  old container detached,
//!                                                                  new container attached
//! ```
//!
//! - Nothing touches the document before the mount gate opens.
//! - Attachment happens in the layout phase, after commit and before paint.
//! - Disposal is synchronous and idempotent; a container that was already
//!   removed from its target (by an ancestor, or by foreign code) is skipped.
//! - A container the portal gave up is released from its document, so
//!   recreating containers on class or target changes reuses node slots. A
//!   container that foreign code moved under another parent is left alone.
//!
//! # Example
//!
//! ```ignore
//! let handle = portal(cx, PortalProps {
//!     children: children(|cx| element(cx, ElementProps {
//!         tag: "span".into(),
//!         children: Some(children(|cx| text(cx, "hi"))),
//!         ..Default::default()
//!     })),
//!     ..Default::default()
//! });
//!
//! root.tick(); // <body><div class="portal"><span>hi</span></div></body>
//! handle.dispose(); // <body></body>
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::dom::{DomError, Node, NodeRef};
use crate::engine::{owned_effect, queue_layout_effect, Cx, NestingContext};
use crate::types::{NodeFlags, CONTAINER_TAG};
use super::control_flow::render_into;
use super::mount_gate::MountGate;
use super::types::{Children, Cleanup, PortalProps, PropValue};

// =============================================================================
// Mount Target Resolution & Container Lifecycle
// =============================================================================

/// Pick the node a portal container should attach under.
///
/// Priority: enclosing portal, then the explicit reference, then
/// `default_root`. Returns `None` only when all three are empty.
pub fn resolve_mount_target(
    nesting: &NestingContext,
    container: Option<&NodeRef>,
    default_root: Option<Node>,
) -> Option<Node> {
    nesting
        .parent_portal_node
        .clone()
        .or_else(|| container.and_then(NodeRef::get))
        .or(default_root)
}

/// Create a detached container for `mount_target`.
///
/// The container comes from the target's owner document, so portals aimed at
/// a frame's document get a node that frame accepts.
pub fn create_container(mount_target: &Node, class_name: &str) -> Node {
    let container = mount_target.owner_document().create_element(CONTAINER_TAG);
    container.set_class_name(class_name);
    container.insert_flags(NodeFlags::PORTAL_CONTAINER);
    container
}

/// Append `container` as the last child of `mount_target`.
pub fn attach(container: &Node, mount_target: &Node) -> Result<(), DomError> {
    mount_target.append_child(container)
}

/// Remove `container` from `mount_target` if it is still a child there.
///
/// Returns whether anything was removed. A container that already left the
/// target is not an error.
pub fn detach(container: &Node, mount_target: &Node) -> bool {
    if !mount_target.has_child(container) {
        return false;
    }
    mount_target.remove_child(container).is_ok()
}

// =============================================================================
// Portal State
// =============================================================================

/// Where a portal is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalState {
    /// Waiting for the mount gate. Nothing rendered.
    Unready,
    /// Gate open, container not (or no longer) attached.
    ReadyUnmounted,
    /// Container attached, children rendered into it.
    Attached,
    /// Disposed. Terminal.
    Detached,
}

/// The container currently owned by a portal.
struct Mounted {
    container: Node,
    target: Node,
    class_name: String,
    children_cleanup: Option<Cleanup>,
}

struct PortalInstance {
    cx: Cx,
    children: Children,
    class_name: PropValue<String>,
    container_ref: Option<NodeRef>,
    gate: MountGate,
    state: Cell<PortalState>,
    mounted: RefCell<Option<Mounted>>,
    sync_queued: Cell<bool>,
    stop_tracking: RefCell<Option<Cleanup>>,
}

impl PortalInstance {
    /// Queue a layout-phase sync, at most one at a time.
    fn schedule_sync(self: &Rc<Self>) {
        if self.sync_queued.replace(true) {
            return;
        }
        let instance = Rc::clone(self);
        queue_layout_effect(move || {
            instance.sync_queued.set(false);
            instance.sync();
        });
    }

    /// Bring the attached container in line with the current inputs.
    fn sync(&self) {
        if self.state.get() == PortalState::Detached || !self.gate.is_ready() {
            return;
        }

        let class_name = self.class_name.get();
        let target = resolve_mount_target(
            self.cx.nesting(),
            self.container_ref.as_ref(),
            self.cx.environment().default_root(),
        );

        let Some(target) = target else {
            warn!("portal has no mount target, rendering nothing");
            self.unmount();
            self.state.set(PortalState::ReadyUnmounted);
            return;
        };

        let unchanged = self
            .mounted
            .borrow()
            .as_ref()
            .is_some_and(|m| m.target == target && m.class_name == class_name);
        if unchanged {
            return;
        }

        // Old container must be gone before the new one is attached
        self.unmount();
        self.state.set(PortalState::ReadyUnmounted);
        self.mount(target, class_name);
    }

    fn mount(&self, target: Node, class_name: String) {
        let container = create_container(&target, &class_name);
        if let Err(error) = attach(&container, &target) {
            warn!(%error, ?target, "failed to attach portal container");
            container.release();
            return;
        }
        debug!(?container, ?target, "portal container attached");

        *self.mounted.borrow_mut() = Some(Mounted {
            container: container.clone(),
            target,
            class_name,
            children_cleanup: None,
        });
        self.state.set(PortalState::Attached);

        let nested = self.cx.with_nesting(NestingContext::within(container.clone()));
        let children_cleanup = render_into(&nested, &container, &self.children);

        // Children may have disposed us while rendering
        let orphaned = {
            let mut mounted = self.mounted.borrow_mut();
            match mounted.as_mut() {
                Some(current) if current.container == container => {
                    current.children_cleanup = Some(children_cleanup);
                    None
                }
                _ => Some(children_cleanup),
            }
        };
        if let Some(cleanup) = orphaned {
            cleanup();
        }
    }

    /// Clean up the children, detach the container, then release it.
    fn unmount(&self) {
        let Some(mounted) = self.mounted.borrow_mut().take() else {
            return;
        };

        if let Some(cleanup) = mounted.children_cleanup {
            cleanup();
        }

        let container = mounted.container;
        if detach(&container, &mounted.target) {
            debug!(?container, "portal container detached");
        } else if container.parent().is_some() {
            trace!(?container, "portal container moved elsewhere, leaving it");
            return;
        } else {
            trace!(?container, "portal container already removed");
        }
        container.release();
    }

    fn dispose(&self) {
        if self.state.get() == PortalState::Detached {
            return;
        }
        self.state.set(PortalState::Detached);

        let stop = self.stop_tracking.borrow_mut().take();
        if let Some(stop) = stop {
            stop();
        }

        self.unmount();
        debug!("portal disposed");
    }
}

// =============================================================================
// Portal Component
// =============================================================================

/// Render `props.children` into a container outside the current position.
///
/// Nothing is rendered until the mount gate opens on the first post-commit
/// flush, and only in a pass with a live document. The container attaches
/// in the following layout flush.
///
/// The returned handle disposes the portal when dropped or converted into a
/// [`Cleanup`] and called.
pub fn portal(cx: &Cx, mut props: PortalProps) -> PortalHandle {
    let class_name = props.take_class_name();

    let instance = Rc::new(PortalInstance {
        cx: cx.clone(),
        children: props.children,
        class_name,
        container_ref: props.container,
        gate: MountGate::new(cx),
        state: Cell::new(PortalState::Unready),
        mounted: RefCell::new(None),
        sync_queued: Cell::new(false),
        stop_tracking: RefCell::new(None),
    });

    // Weak: the instance owns this effect through `stop_tracking`. Owned, not
    // parented to a surrounding effect, so its tracking ends only on dispose.
    let weak: Weak<PortalInstance> = Rc::downgrade(&instance);
    let stop = owned_effect(move || {
        let Some(instance) = weak.upgrade() else { return };

        if !instance.gate.is_ready() {
            return;
        }

        // Read every input so a change re-runs this effect
        let _ = instance.class_name.get();
        if let Some(node_ref) = &instance.container_ref {
            let _ = node_ref.get();
        }

        if instance.state.get() == PortalState::Unready {
            instance.state.set(PortalState::ReadyUnmounted);
        }
        instance.schedule_sync();
    });
    *instance.stop_tracking.borrow_mut() = Some(stop);

    PortalHandle { instance }
}

// =============================================================================
// Portal Handle
// =============================================================================

/// Owner of a live portal.
pub struct PortalHandle {
    instance: Rc<PortalInstance>,
}

impl PortalHandle {
    pub fn state(&self) -> PortalState {
        self.instance.state.get()
    }

    /// Whether the mount gate has opened.
    pub fn is_ready(&self) -> bool {
        self.instance.gate.is_ready()
    }

    /// The container currently attached, if any.
    pub fn container(&self) -> Option<Node> {
        self.instance.mounted.borrow().as_ref().map(|m| m.container.clone())
    }

    /// The node the current container is attached under, if any.
    pub fn mount_target(&self) -> Option<Node> {
        self.instance.mounted.borrow().as_ref().map(|m| m.target.clone())
    }

    /// Stop tracking, clean up the children and detach the container.
    ///
    /// Safe to call any number of times.
    pub fn dispose(&self) {
        self.instance.dispose();
    }

    /// Turn the handle into a component cleanup.
    pub fn into_cleanup(self) -> Cleanup {
        Box::new(move || self.dispose())
    }
}

impl Drop for PortalHandle {
    fn drop(&mut self) {
        self.instance.dispose();
    }
}

impl From<PortalHandle> for Cleanup {
    fn from(handle: PortalHandle) -> Self {
        handle.into_cleanup()
    }
}

impl fmt::Debug for PortalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalHandle")
            .field("state", &self.state())
            .field("container", &self.container())
            .field("mount_target", &self.mount_target())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::signal;
    use crate::dom::Document;
    use crate::engine::{flush, reset_scheduler, BrowserEnvironment, ServerEnvironment};
    use crate::primitives::{children, element, text, ElementProps};
    use crate::types::DEFAULT_PORTAL_CLASS;

    fn client() -> (Document, Cx) {
        reset_scheduler();
        let doc = Document::new();
        let cx = Cx::new(Rc::new(BrowserEnvironment::new(doc.clone())), Some(doc.body()));
        (doc, cx)
    }

    fn span(label: &'static str) -> Children {
        children(move |cx| element(cx, ElementProps {
            tag: "span".into(),
            children: Some(children(move |cx| text(cx, label))),
            ..Default::default()
        }))
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolve_falls_back_to_default_root() {
        let doc = Document::new();
        let empty_ref = NodeRef::new();

        let target = resolve_mount_target(&NestingContext::root(), Some(&empty_ref), Some(doc.body()));
        assert_eq!(target, Some(doc.body()));

        let target = resolve_mount_target(&NestingContext::root(), None, Some(doc.body()));
        assert_eq!(target, Some(doc.body()));

        assert_eq!(resolve_mount_target(&NestingContext::root(), None, None), None);
    }

    #[test]
    fn test_resolve_priority() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let explicit = doc.create_element("aside");
        let node_ref = NodeRef::to(explicit.clone());

        let target = resolve_mount_target(&NestingContext::root(), Some(&node_ref), Some(doc.body()));
        assert_eq!(target, Some(explicit));

        let target = resolve_mount_target(
            &NestingContext::within(outer.clone()),
            Some(&node_ref),
            Some(doc.body()),
        );
        assert_eq!(target, Some(outer), "enclosing portal beats explicit container");
    }

    // -------------------------------------------------------------------------
    // Container lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_create_attach_detach() {
        let doc = Document::new();
        let body = doc.body();

        let container = create_container(&body, "overlay");
        assert_eq!(container.class_name(), "overlay");
        assert_eq!(container.tag_name().as_deref(), Some(CONTAINER_TAG));
        assert!(container.flags().contains(NodeFlags::PORTAL_CONTAINER));
        assert_eq!(container.parent(), None);

        attach(&container, &body).unwrap();
        assert_eq!(body.last_child(), Some(container.clone()));

        assert!(detach(&container, &body));
        assert!(!detach(&container, &body), "second detach is a no-op");
    }

    #[test]
    fn test_detach_skips_foreign_parent() {
        let doc = Document::new();
        let body = doc.body();
        let elsewhere = doc.create_element("section");
        body.append_child(&elsewhere).unwrap();

        let container = create_container(&body, "portal");
        attach(&container, &body).unwrap();
        // Foreign code moved the container
        elsewhere.append_child(&container).unwrap();

        assert!(!detach(&container, &body));
        assert_eq!(container.parent(), Some(elsewhere), "must not touch a node it no longer owns");
    }

    #[test]
    fn test_container_uses_target_document() {
        let doc = Document::new();
        let frame = doc.create_frame();
        let inner = frame.content_document().unwrap();

        let container = create_container(&inner.body(), "portal");
        assert_eq!(container.owner_document(), inner);
        assert!(attach(&container, &inner.body()).is_ok());
    }

    // -------------------------------------------------------------------------
    // Component
    // -------------------------------------------------------------------------

    #[test]
    fn test_nothing_before_gate_opens() {
        let (doc, cx) = client();
        let before = doc.node_count();

        let handle = portal(&cx, PortalProps::new(span("hi")));

        assert_eq!(handle.state(), PortalState::Unready);
        assert!(!handle.is_ready());
        assert_eq!(doc.body().child_count(), 0);
        assert_eq!(doc.node_count(), before, "no node may be created before readiness");
        assert_eq!(handle.container(), None);
    }

    #[test]
    fn test_attaches_after_flush() {
        let (doc, cx) = client();

        let handle = portal(&cx, PortalProps::new(span("hi")));
        flush();

        assert_eq!(handle.state(), PortalState::Attached);
        assert_eq!(doc.body().inner_html(), r#"<div class="portal"><span>hi</span></div>"#);
        assert_eq!(handle.mount_target(), Some(doc.body()));
        assert_eq!(handle.container(), doc.body().last_child());
    }

    #[test]
    fn test_pre_render_never_attaches() {
        reset_scheduler();
        let scratch = Document::new();
        let cx = Cx::new(Rc::new(ServerEnvironment), Some(scratch.body()));

        let handle = portal(&cx, PortalProps::new(span("hi")));
        flush();

        assert_eq!(handle.state(), PortalState::Unready);
        assert_eq!(scratch.body().child_count(), 0);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (doc, cx) = client();

        let handle = portal(&cx, PortalProps::new(span("hi")));
        flush();
        assert_eq!(doc.body().child_count(), 1);

        handle.dispose();
        assert_eq!(handle.state(), PortalState::Detached);
        assert_eq!(doc.body().child_count(), 0);

        handle.dispose();
        drop(handle);
        assert_eq!(doc.body().child_count(), 0);
    }

    #[test]
    fn test_dispose_after_external_removal() {
        let (doc, cx) = client();

        let handle = portal(&cx, PortalProps::new(span("hi")));
        flush();

        let container = handle.container().unwrap();
        container.remove();
        assert_eq!(doc.body().child_count(), 0);

        handle.dispose();
        assert_eq!(handle.state(), PortalState::Detached);
    }

    #[test]
    fn test_dispose_before_ready() {
        let (doc, cx) = client();

        let handle = portal(&cx, PortalProps::new(span("hi")));
        handle.dispose();
        flush();

        assert_eq!(handle.state(), PortalState::Detached);
        assert_eq!(doc.body().child_count(), 0);
    }

    #[test]
    fn test_explicit_container() {
        let (doc, cx) = client();
        let aside = doc.create_element("aside");
        doc.body().append_child(&aside).unwrap();

        let handle = portal(&cx, PortalProps {
            children: span("side"),
            container: Some(NodeRef::to(aside.clone())),
            ..Default::default()
        });
        flush();

        assert_eq!(handle.mount_target(), Some(aside.clone()));
        assert_eq!(aside.inner_html(), r#"<div class="portal"><span>side</span></div>"#);
    }

    #[test]
    fn test_class_change_recreates_container() {
        let (doc, cx) = client();
        let class = signal("first".to_string());

        let handle = portal(&cx, PortalProps {
            children: span("hi"),
            class_name: Some(class.clone().into()),
            ..Default::default()
        });
        flush();
        let old = handle.container().unwrap();
        assert!(old.has_class("first"));

        class.set("second".to_string());
        flush();

        let new = handle.container().unwrap();
        assert_ne!(old, new);
        assert!(new.has_class("second"));
        assert_eq!(old.parent(), None);
        assert_eq!(old.child_count(), 0, "old content cleaned up");
        assert_eq!(doc.body().children(), vec![new]);
        assert_eq!(doc.body().inner_html(), r#"<div class="second"><span>hi</span></div>"#);
    }

    #[test]
    fn test_default_class() {
        let (_doc, cx) = client();
        let handle = portal(&cx, PortalProps::default());
        flush();

        assert_eq!(handle.container().unwrap().class_name(), DEFAULT_PORTAL_CLASS);
    }

    #[test]
    fn test_nested_portal_attaches_inside_outer() {
        let (doc, cx) = client();

        let outer = portal(&cx, PortalProps::new(children(|cx| {
            portal(cx, PortalProps {
                children: span("inner"),
                class_name: Some("inner".into()),
                ..Default::default()
            })
        })));
        flush();

        let outer_container = outer.container().unwrap();
        let inner_container = outer_container.children()[0].clone();
        assert!(inner_container.has_class("inner"));
        assert_eq!(inner_container.parent(), Some(outer_container.clone()));
        assert_eq!(doc.body().children(), vec![outer_container]);
    }

    #[test]
    fn test_disposing_outer_removes_nested() {
        let (doc, cx) = client();

        let outer = portal(&cx, PortalProps::new(children(|cx| {
            portal(cx, PortalProps::new(span("deep")))
        })));
        flush();
        let outer_container = outer.container().unwrap();
        assert_eq!(outer_container.child_count(), 1);

        outer.dispose();
        assert_eq!(doc.body().child_count(), 0);
        assert_eq!(outer_container.child_count(), 0);
    }

    #[test]
    fn test_ref_change_moves_container() {
        let (doc, cx) = client();
        let first = doc.create_element("section");
        let second = doc.create_element("section");
        doc.body().append_child(&first).unwrap();
        doc.body().append_child(&second).unwrap();

        let node_ref = NodeRef::to(first.clone());
        let handle = portal(&cx, PortalProps {
            children: span("x"),
            container: Some(node_ref.clone()),
            ..Default::default()
        });
        flush();
        assert_eq!(first.child_count(), 1);

        node_ref.set(second.clone());
        flush();

        assert_eq!(first.child_count(), 0);
        assert_eq!(second.child_count(), 1);
        assert_eq!(handle.mount_target(), Some(second));

        node_ref.clear();
        flush();
        assert_eq!(handle.mount_target(), Some(doc.body()), "cleared ref falls back to body");
    }

    #[test]
    fn test_into_cleanup_disposes() {
        let (doc, cx) = client();

        let cleanup: Cleanup = portal(&cx, PortalProps::new(span("hi"))).into();
        flush();
        assert_eq!(doc.body().child_count(), 1);

        cleanup();
        assert_eq!(doc.body().child_count(), 0);
    }
}
