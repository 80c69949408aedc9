use std::{cell::Cell, rc::Rc};

use tracing::trace;

use crate::core::{enter, is_running, BindSink, EffectId, EffectRef};


/// Call a function now, and again each time a signal it read is set.
///
/// `f` runs once before this function returns. Every signal read during a run subscribes
/// the effect, and the subscription is kept for the lifetime of the signal, even if a later
/// run no longer reads that signal.
///
/// If `f` panics, the panic propagates to the caller of `effect` or of the
/// [`set`](crate::WriteSignal::set) that triggered the run.
pub fn effect(f: impl Fn() + 'static) {
    Effect::new(f);
}

/// Handle to an effect created by [`Effect::new`].
///
/// Dropping the handle does not stop the effect.
#[derive(Clone)]
pub struct Effect(Rc<EffectNode>);

impl Effect {
    /// Create an effect and run it once. See [`effect`].
    pub fn new(f: impl Fn() + 'static) -> Self {
        let node = Rc::new(EffectNode {
            id: EffectId::new(),
            f: Box::new(f),
            run_count: Cell::new(0),
        });
        node.clone().run();
        Self(node)
    }

    pub fn id(&self) -> EffectId {
        self.0.id
    }

    /// Number of times the function has been called, including the initial run.
    pub fn run_count(&self) -> usize {
        self.0.run_count.get()
    }

    /// Returns `true` while the function is executing.
    pub fn is_running(&self) -> bool {
        is_running(self.0.id)
    }
}
impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.0.id)
            .field("run_count", &self.0.run_count.get())
            .finish()
    }
}

struct EffectNode {
    id: EffectId,
    f: Box<dyn Fn()>,
    run_count: Cell<usize>,
}

impl BindSink for EffectNode {
    fn run(self: Rc<Self>) {
        trace!(effect = %self.id, "run effect");
        self.run_count.set(self.run_count.get() + 1);
        let _guard = enter(EffectRef::new(self.id, self.clone()));
        (self.f)();
    }
}
