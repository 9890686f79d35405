//! Primitive types - Props, children and cleanup.
//!
//! These types define the interface for component props.
//! Props support static values, signals, and getters for reactivity.

use std::rc::Rc;

use spark_signals::Signal;

use crate::dom::NodeRef;
use crate::engine::Cx;
use crate::types::DEFAULT_PORTAL_CLASS;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

/// A cleanup that does nothing.
pub fn noop() -> Cleanup {
    Box::new(|| {})
}

// =============================================================================
// Children
// =============================================================================

/// A renderable subtree.
///
/// Children receive the context to render with and return their cleanup.
/// They are `Fn` (not `FnOnce`) because a portal re-renders its children
/// whenever it has to recreate its container.
pub type Children = Rc<dyn Fn(&Cx) -> Cleanup>;

/// Wrap a closure as [`Children`].
pub fn children<F, R>(render: F) -> Children
where
    F: Fn(&Cx) -> R + 'static,
    R: Into<Cleanup>,
{
    Rc::new(move |cx: &Cx| render(cx).into())
}

/// Children that render nothing.
pub fn empty_children() -> Children {
    Rc::new(|_: &Cx| noop())
}

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// Reading it from inside an effect creates a dependency on the signal (or on
/// whatever the getter reads), so the component reacts to changes.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    /// Whether reads can change over time.
    pub fn is_reactive(&self) -> bool {
        !matches!(self, PropValue::Static(_))
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

// =============================================================================
// Element Props
// =============================================================================

/// Properties for the element primitive.
///
/// # Example
///
/// ```ignore
/// element(cx, ElementProps {
///     tag: "ul".into(),
///     class_name: Some("menu".into()),
///     children: Some(children(|cx| text(cx, "item"))),
/// });
/// ```
pub struct ElementProps {
    /// Tag name (default: `div`).
    pub tag: String,
    /// Static `class` attribute.
    pub class_name: Option<String>,
    /// Children rendered inside the element.
    pub children: Option<Children>,
}

impl ElementProps {
    /// Props for a bare element with the given tag.
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }
}

impl Default for ElementProps {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            class_name: None,
            children: None,
        }
    }
}

// =============================================================================
// Portal Props
// =============================================================================

/// Properties for the portal primitive.
///
/// # Example
///
/// ```ignore
/// let target = NodeRef::new();
///
/// let handle = portal(cx, PortalProps {
///     children: children(|cx| text(cx, "floating")),
///     class_name: Some("tooltip".into()),
///     container: Some(target.clone()),
/// });
/// ```
pub struct PortalProps {
    /// Content rendered into the portal container.
    pub children: Children,

    /// Class of the generated container (default: `"portal"`).
    ///
    /// Changing it recreates the container.
    pub class_name: Option<PropValue<String>>,

    /// Explicit mount target. Ignored inside another portal; falls through to
    /// the default root while it points at nothing.
    pub container: Option<NodeRef>,
}

impl PortalProps {
    /// Props rendering `children` with every other option defaulted.
    pub fn new(children: Children) -> Self {
        Self {
            children,
            class_name: None,
            container: None,
        }
    }

    /// The class the container gets, falling back to the default label.
    pub(crate) fn take_class_name(&mut self) -> PropValue<String> {
        self.class_name
            .take()
            .unwrap_or_else(|| PropValue::Static(DEFAULT_PORTAL_CLASS.to_string()))
    }
}

impl Default for PortalProps {
    fn default() -> Self {
        Self::new(empty_children())
    }
}
