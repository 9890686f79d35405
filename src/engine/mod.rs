//! Render Engine - The host side of rendering.
//!
//! The engine provides what components rely on but never implement themselves:
//! - Scheduler: layout and post-commit effect queues
//! - Environment: whether a live document exists in this pass
//! - Cx: tree-scoped render context (parent node, nesting context)
//! - Ownership: component effects that outlive re-runs of surrounding effects
//!
//! # Phases
//!
//! ```text
//! render (components run, in-place nodes attached)
//!   → layout effects (portals attach containers)
//!   → post-commit effects (mount gates open)
//!   → layout effects queued by the opened gates ...
//! ```

mod context;
mod environment;
mod owner;
pub mod scheduler;

pub use context::*;
pub use environment::*;
pub use owner::{detached, owned_effect};
pub use scheduler::{flush, pending_jobs, queue_effect, queue_layout_effect, reset_scheduler};
