//! Effect Ownership - Keep component effects out of other effects' hands.
//!
//! spark-signals parents a new effect to whichever effect is running when it
//! is created, and destroys those children every time the parent re-runs. A
//! component rendered from inside an effect (a `show` branch, a user effect)
//! would lose its own tracking the next time that outer effect re-ran, even
//! when the component itself stays alive.
//!
//! The rule used throughout the primitives:
//! - Rendering that happens inside an effect runs [`detached`]: nothing it
//!   reads is tracked by the outer effect, and nothing it creates is parented
//!   to it.
//! - A component's own effect is created with [`owned_effect`] and stopped by
//!   the component's cleanup, so it lives exactly as long as the component.

use std::rc::Weak;

use spark_signals::{effect, with_context, AnyReaction};

type ActiveReaction = Option<Weak<dyn AnyReaction>>;

/// Restores the running reaction and effect on drop.
struct Reattach {
    reaction: ActiveReaction,
    effect: ActiveReaction,
}

impl Drop for Reattach {
    fn drop(&mut self) {
        let reaction = self.reaction.take();
        let effect = self.effect.take();
        with_context(|ctx| {
            ctx.set_active_reaction(reaction);
            ctx.set_active_effect(effect);
        });
    }
}

/// Run `f` as if no effect were running.
///
/// Signal reads inside `f` create no dependency and effects created inside `f`
/// have no parent. The previous state is restored afterwards, also on panic.
pub fn detached<R>(f: impl FnOnce() -> R) -> R {
    let _reattach = with_context(|ctx| Reattach {
        reaction: ctx.set_active_reaction(None),
        effect: ctx.set_active_effect(None),
    });
    f()
}

/// Create an effect whose lifetime is controlled only by the returned stop
/// function, never by the effect that happens to be running.
pub fn owned_effect<F>(f: F) -> Box<dyn FnOnce()>
where
    F: FnMut() + 'static,
{
    let stop = detached(move || effect(f));
    Box::new(stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use spark_signals::{flush_sync, signal};

    #[test]
    fn test_owned_effect_survives_outer_rerun() {
        let outer_source = signal(0);
        let inner_source = signal(0);
        let inner_runs = Rc::new(Cell::new(0));

        let created = Rc::new(Cell::new(false));
        let stops: Rc<std::cell::RefCell<Vec<Box<dyn FnOnce()>>>> = Rc::default();

        let outer_clone = outer_source.clone();
        let inner_clone = inner_source.clone();
        let runs_clone = inner_runs.clone();
        let created_clone = created.clone();
        let stops_clone = stops.clone();
        let stop_outer = effect(move || {
            let _ = outer_clone.get();
            if created_clone.replace(true) {
                return;
            }
            let inner_clone = inner_clone.clone();
            let runs_clone = runs_clone.clone();
            stops_clone.borrow_mut().push(owned_effect(move || {
                let _ = inner_clone.get();
                runs_clone.set(runs_clone.get() + 1);
            }));
        });
        flush_sync();
        let after_create = inner_runs.get();
        assert!(after_create >= 1);

        // Outer re-runs without recreating the inner effect
        outer_source.set(1);
        flush_sync();

        inner_source.set(1);
        flush_sync();
        assert_eq!(inner_runs.get(), after_create + 1, "inner effect still tracking");

        stop_outer();
        for stop in stops.borrow_mut().drain(..) {
            stop();
        }
    }

    #[test]
    fn test_detached_reads_are_untracked() {
        let source = signal(0);
        let runs = Rc::new(Cell::new(0));

        let source_clone = source.clone();
        let runs_clone = runs.clone();
        let stop = effect(move || {
            runs_clone.set(runs_clone.get() + 1);
            detached(|| source_clone.get());
        });
        flush_sync();
        assert_eq!(runs.get(), 1);

        source.set(5);
        flush_sync();
        assert_eq!(runs.get(), 1, "read inside detached created no dependency");
        stop();
    }
}
