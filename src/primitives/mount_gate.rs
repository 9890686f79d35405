//! Mount Gate - Hold off document mutation until the pass is known to be live.
//!
//! A gate starts closed. Creating it queues one post-commit job; when that job
//! runs it asks the environment whether a live document exists and, if so,
//! opens the gate. A gate never closes again.
//!
//! In a pre-render pass post-commit jobs either never run or find no live
//! document, so the gate stays closed and its owner renders nothing. The
//! markup produced ahead of time therefore matches the first client render.

use spark_signals::{signal, Signal};
use tracing::{debug, trace};

use crate::engine::{queue_effect, Cx};

/// One-shot readiness flag.
#[derive(Clone)]
pub struct MountGate {
    ready: Signal<bool>,
}

impl MountGate {
    /// Create a closed gate and schedule its readiness check.
    pub fn new(cx: &Cx) -> Self {
        let ready = signal(false);

        let environment = cx.environment().clone();
        let flag = ready.clone();
        queue_effect(move || {
            if environment.can_use_dom() {
                debug!("mount gate open");
                flag.set(true);
            } else {
                trace!("no live document, mount gate stays closed");
            }
        });

        Self { ready }
    }

    /// Whether the gate is open (creates a reactive dependency inside effects).
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// The underlying signal, for components that want to react to opening.
    pub fn ready_signal(&self) -> Signal<bool> {
        self.ready.clone()
    }
}
