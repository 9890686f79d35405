//! Control Flow Primitives - Conditional and off-tree rendering.
//!
//! - [`show`] - Conditional rendering based on reactive conditions
//! - [`render_into`] - Render children under an arbitrary node
//!
//! # Pattern: Detached Branches
//!
//! `show()` tracks its condition with one effect and renders branches from
//! inside that effect. Branches run [`detached`], so:
//! 1. Only the condition getter is a dependency of the `show` effect; signals a
//!    branch reads while rendering do not re-run it
//! 2. Effects a branch creates (a reactive `text`, a portal's tracking) are not
//!    children of the `show` effect and survive its re-runs
//! 3. Each branch owns its effects through its own [`Cleanup`], which `show`
//!    calls when the branch is swapped out or `show` itself is cleaned up
//!
//! # Pattern: Context Capture
//!
//! `show()` captures the [`Cx`] it was called with and renders every branch
//! with it, so a branch created long after the initial render still lands
//! under the right parent and sees the right nesting context.
//!
//! # Component Lifecycle
//!
//! ## show()
//! - When condition becomes true: `then_fn` is called, component created
//! - When condition becomes false: previous cleanup runs, component destroyed
//! - If `else_fn` provided: it renders when condition is false
//! - On show() cleanup: tracking stopped, current branch cleaned up
//!
//! ## render_into()
//! - Children attach under the target instead of the current parent
//! - Everything else in the context (nesting, environment) is preserved

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::dom::Node;
use crate::engine::{detached, owned_effect, Cx};
use super::types::{Children, Cleanup};

// =============================================================================
// show() - Conditional rendering
// =============================================================================

/// Conditionally render components based on a reactive condition.
///
/// The condition getter establishes a reactive dependency, so the branch is
/// swapped automatically when it changes. The condition re-running with the
/// same result leaves the current branch, and every effect it owns, alone.
///
/// # Example
///
/// ```ignore
/// let open = signal(false);
/// let open_clone = open.clone();
///
/// let cleanup = show(
///     cx,
///     move || open_clone.get(),
///     |cx| portal(cx, PortalProps::new(children(|cx| text(cx, "Dialog")))),
///     None::<fn(&Cx) -> Cleanup>,
/// );
///
/// open.set(true);  // portal created (attaches on the next flush)
/// open.set(false); // portal disposed, container removed
/// cleanup();
/// ```
pub fn show<ThenF, ElseF, ThenR, ElseR>(
    cx: &Cx,
    condition: impl Fn() -> bool + 'static,
    then_fn: ThenF,
    else_fn: Option<ElseF>,
) -> Cleanup
where
    ThenF: Fn(&Cx) -> ThenR + 'static,
    ElseF: Fn(&Cx) -> ElseR + 'static,
    ThenR: Into<Cleanup>,
    ElseR: Into<Cleanup>,
{
    let cx = cx.clone();

    // Storage for current cleanup and condition state
    let cleanup: Rc<RefCell<Option<Cleanup>>> = Rc::new(RefCell::new(None));
    let was_true: Rc<Cell<Option<bool>>> = Rc::new(Cell::new(None));

    let cleanup_for_update = cleanup.clone();

    // Update function - runs when condition changes
    let update = move |new_condition: bool| {
        // Skip if condition unchanged
        if was_true.get() == Some(new_condition) {
            return;
        }
        was_true.set(Some(new_condition));

        // Cleanup previous branch (outside the borrow, it may re-enter)
        let previous = cleanup_for_update.borrow_mut().take();
        if let Some(previous) = previous {
            previous();
        }

        let new_cleanup = if new_condition {
            Some(then_fn(&cx).into())
        } else {
            else_fn.as_ref().map(|f| f(&cx).into())
        };

        *cleanup_for_update.borrow_mut() = new_cleanup;
    };

    let stop = owned_effect(move || {
        let current = condition();
        detached(|| update(current));
    });

    Box::new(move || {
        stop();
        let current = cleanup.borrow_mut().take();
        if let Some(current) = current {
            current();
        }
    })
}

// =============================================================================
// render_into() - Off-tree rendering
// =============================================================================

/// Render `children` under `target` instead of the current parent.
///
/// The rest of the context travels along unchanged, so anything the caller
/// put into `cx` (a nesting context in particular) is visible to the
/// children and their descendants.
pub fn render_into(cx: &Cx, target: &Node, children: &Children) -> Cleanup {
    trace!(node = ?target, "rendering off-tree");
    children(&cx.with_parent(target.clone()))
}
