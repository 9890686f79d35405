//! Mount API - Root lifecycle and commit ticks.
//!
//! # Example
//!
//! ```ignore
//! use spark_portal::{Document, Root};
//!
//! let document = Document::new();
//! let mut root = Root::client(document.body());
//!
//! root.render(|cx| app(cx));
//!
//! // Run layout and post-commit effects (portals attach here)
//! root.tick();
//!
//! // Clean up
//! root.unmount();
//! ```
//!
//! # Pre-rendering
//!
//! ```ignore
//! let mut root = Root::server();
//! root.render(|cx| app(cx));
//! root.tick();
//! let html = root.to_html(); // portals contribute nothing
//! ```

use std::rc::Rc;

use tracing::debug;

use crate::dom::{Document, Node};
use crate::engine::{flush, BrowserEnvironment, Cx, Environment, ServerEnvironment};
use crate::primitives::Cleanup;

// =============================================================================
// Root
// =============================================================================

/// A mounted component tree.
///
/// Holds:
/// - The render context handed to the app
/// - The node the app renders into
/// - The app's cleanup (run on unmount, re-render or drop)
pub struct Root {
    cx: Cx,
    mount_node: Node,
    cleanup: Option<Cleanup>,
}

impl Root {
    /// Root for a client pass rendering into `mount_node`.
    ///
    /// Portals without a better target fall back to the `<body>` of the mount
    /// node's document.
    pub fn client(mount_node: Node) -> Self {
        let environment = Rc::new(BrowserEnvironment::new(mount_node.owner_document()));
        Self::with_environment(environment, mount_node)
    }

    /// Root for a pre-render pass.
    ///
    /// Renders into the body of a scratch document; no live document is
    /// available, so portals stay unmounted.
    pub fn server() -> Self {
        let scratch = Document::new();
        Self::with_environment(Rc::new(ServerEnvironment), scratch.body())
    }

    /// Root with a caller-supplied environment.
    pub fn with_environment(environment: Rc<dyn Environment>, mount_node: Node) -> Self {
        Self {
            cx: Cx::new(environment, Some(mount_node.clone())),
            mount_node,
            cleanup: None,
        }
    }

    /// Context the app is rendered with.
    pub fn cx(&self) -> &Cx {
        &self.cx
    }

    pub fn mount_node(&self) -> &Node {
        &self.mount_node
    }

    /// Render `app`, replacing whatever was rendered before.
    pub fn render<F, R>(&mut self, app: F)
    where
        F: FnOnce(&Cx) -> R,
        R: Into<Cleanup>,
    {
        self.clear();
        debug!(mount = ?self.mount_node, "rendering root");
        self.cleanup = Some(app(&self.cx).into());
    }

    /// Run every queued layout and post-commit effect.
    ///
    /// Returns the number of jobs run.
    pub fn tick(&self) -> usize {
        flush()
    }

    /// Markup currently under the mount node.
    pub fn to_html(&self) -> String {
        self.mount_node.inner_html()
    }

    /// Whether an app is currently rendered.
    pub fn is_mounted(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Clean up the app and release the root.
    pub fn unmount(mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            debug!(mount = ?self.mount_node, "unmounting root");
            cleanup();
        }
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        self.clear();
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Render `app` into `mount_node` on a live document and run the first tick.
pub fn mount<F, R>(mount_node: Node, app: F) -> Root
where
    F: FnOnce(&Cx) -> R,
    R: Into<Cleanup>,
{
    let mut root = Root::client(mount_node);
    root.render(app);
    root.tick();
    root
}

/// Unmount and clean up.
pub fn unmount(root: Root) {
    root.unmount();
}

// =============================================================================
// Tests
// =============================================================================
