//! Scheduler - Commit phase effect queues.
//!
//! Rendering is synchronous: primitives create and attach their nodes while
//! the component functions run. Anything that must wait for the render pass
//! to finish is queued here and run by [`flush`]:
//!
//! - **Layout effects** run first, after the tree is built but before the host
//!   paints. Portals attach their containers here so content never shows up
//!   unpositioned.
//! - **Effects** (post-commit) run once all layout effects are drained. The
//!   mount gate flips to ready here.
//!
//! Jobs queued while flushing are picked up by the same flush, layout effects
//! always ahead of post-commit effects.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use spark_signals::flush_sync;
use tracing::trace;

/// A queued unit of commit-phase work.
pub type Job = Box<dyn FnOnce()>;

// =============================================================================
// Scheduler State
// =============================================================================

thread_local! {
    /// Jobs that run after commit, before paint.
    static LAYOUT_QUEUE: RefCell<VecDeque<Job>> = RefCell::new(VecDeque::new());

    /// Jobs that run after every layout job is done.
    static EFFECT_QUEUE: RefCell<VecDeque<Job>> = RefCell::new(VecDeque::new());

    /// Set while `flush` is draining, so nested calls become no-ops.
    static FLUSHING: Cell<bool> = const { Cell::new(false) };
}

// =============================================================================
// Queueing
// =============================================================================

/// Queue a job for the layout phase.
pub fn queue_layout_effect(job: impl FnOnce() + 'static) {
    LAYOUT_QUEUE.with(|queue| queue.borrow_mut().push_back(Box::new(job)));
}

/// Queue a job for the post-commit phase.
pub fn queue_effect(job: impl FnOnce() + 'static) {
    EFFECT_QUEUE.with(|queue| queue.borrow_mut().push_back(Box::new(job)));
}

/// Number of jobs waiting in both queues.
pub fn pending_jobs() -> usize {
    LAYOUT_QUEUE.with(|queue| queue.borrow().len()) + EFFECT_QUEUE.with(|queue| queue.borrow().len())
}

/// Whether a flush is currently running on this thread.
pub fn is_flushing() -> bool {
    FLUSHING.with(Cell::get)
}

// =============================================================================
// Flushing
// =============================================================================

/// Resets the flushing flag even if a job panics.
struct FlushGuard;

impl Drop for FlushGuard {
    fn drop(&mut self) {
        FLUSHING.with(|flag| flag.set(false));
    }
}

fn next_job() -> Option<Job> {
    LAYOUT_QUEUE
        .with(|queue| queue.borrow_mut().pop_front())
        .or_else(|| EFFECT_QUEUE.with(|queue| queue.borrow_mut().pop_front()))
}

/// Run queued jobs until both queues are empty.
///
/// Returns the number of jobs run. Called re-entrantly from inside a job it
/// returns 0 immediately; the outer flush picks up whatever was queued.
pub fn flush() -> usize {
    if FLUSHING.with(|flag| flag.replace(true)) {
        return 0;
    }
    let _guard = FlushGuard;

    let mut ran = 0;
    loop {
        // Let pending signal effects run so they can queue their jobs.
        flush_sync();

        let Some(job) = next_job() else { break };
        job();
        ran += 1;
    }

    if ran > 0 {
        trace!(jobs = ran, "scheduler flushed");
    }
    ran
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop every queued job without running it.
pub fn reset_scheduler() {
    LAYOUT_QUEUE.with(|queue| queue.borrow_mut().clear());
    EFFECT_QUEUE.with(|queue| queue.borrow_mut().clear());
    FLUSHING.with(|flag| flag.set(false));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_layout_before_effects() {
        reset_scheduler();

        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        queue_effect(move || l.borrow_mut().push("effect"));
        let l = log.clone();
        queue_layout_effect(move || l.borrow_mut().push("layout"));

        assert_eq!(pending_jobs(), 2);
        assert_eq!(flush(), 2);
        assert_eq!(*log.borrow(), vec!["layout", "effect"]);
        assert_eq!(pending_jobs(), 0);
    }

    #[test]
    fn test_jobs_queued_during_flush_run() {
        reset_scheduler();

        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        queue_effect(move || {
            l.borrow_mut().push("effect");
            let l2 = l.clone();
            // Queued from a post-commit job: must still run in this flush
            queue_layout_effect(move || l2.borrow_mut().push("late layout"));
        });
        let l = log.clone();
        queue_effect(move || l.borrow_mut().push("second effect"));

        assert_eq!(flush(), 3);
        assert_eq!(*log.borrow(), vec!["effect", "late layout", "second effect"]);
    }

    #[test]
    fn test_nested_flush_is_noop() {
        reset_scheduler();

        let inner_ran = Rc::new(Cell::new(usize::MAX));
        let inner = inner_ran.clone();
        queue_layout_effect(move || inner.set(flush()));

        assert_eq!(flush(), 1);
        assert_eq!(inner_ran.get(), 0);
        assert!(!is_flushing());
    }

    #[test]
    fn test_reset_drops_jobs() {
        reset_scheduler();

        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        queue_effect(move || r.set(true));
        reset_scheduler();

        assert_eq!(flush(), 0);
        assert!(!ran.get());
    }
}
