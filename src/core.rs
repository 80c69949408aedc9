//! Execution context.
//!
//! Each thread owns one stack of running effects. The top of the stack is the effect that
//! signal reads are attributed to. Frames are pushed by [`enter`] and popped when the
//! returned [`ContextGuard`] is dropped, so the stack unwinds correctly even if an effect
//! body panics.
//!
//! The context is never shared between threads. `Signal` and `Effect` are `!Send`, so a
//! signal can only ever observe the stack of the thread it was created on.

use std::{cell::RefCell, rc::Rc, result::Result, thread::AccessError};

use parse_display::Display;


thread_local! {
    static GLOBALS: RefCell<Globals> = RefCell::new(Globals::new());
}

struct Globals {
    stack: Vec<Frame>,
    next_effect_id: usize,
}
impl Globals {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            next_effect_id: 0,
        }
    }
    fn with<T>(f: impl FnOnce(&mut Self) -> T) -> T {
        GLOBALS.with(|g| f(&mut g.borrow_mut()))
    }
    fn try_with<T>(f: impl FnOnce(&mut Self) -> T) -> Result<T, AccessError> {
        GLOBALS.try_with(|g| f(&mut g.borrow_mut()))
    }
    fn current(&self) -> Option<&EffectRef> {
        match self.stack.last()? {
            Frame::Effect(e) => Some(e),
            Frame::Untracked => None,
        }
    }
    fn push(&mut self, frame: Frame) {
        self.stack.push(frame);
    }
    fn pop(&mut self, expected: Option<EffectId>) {
        let popped = self.stack.pop();
        debug_assert!(
            popped.as_ref().map(|f| f.id()) == Some(expected),
            "execution context mismatch: expected {expected:?}"
        );
    }
}

enum Frame {
    Effect(EffectRef),
    Untracked,
}
impl Frame {
    fn id(&self) -> Option<EffectId> {
        match self {
            Frame::Effect(e) => Some(e.id),
            Frame::Untracked => None,
        }
    }
}

/// Identity of an effect.
///
/// Ids are unique within a thread and never reused.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Display)]
#[display("effect#{0}")]
pub struct EffectId(usize);

impl EffectId {
    pub(crate) fn new() -> Self {
        Globals::with(|g| {
            let id = g.next_effect_id;
            g.next_effect_id += 1;
            EffectId(id)
        })
    }
}

/// A computation that can be rerun by a signal.
pub(crate) trait BindSink: 'static {
    fn run(self: Rc<Self>);
}

/// Strong reference to an effect, as stored on the stack and in subscriber sets.
#[derive(Clone)]
pub(crate) struct EffectRef {
    id: EffectId,
    sink: Rc<dyn BindSink>,
}
impl EffectRef {
    pub fn new(id: EffectId, sink: Rc<dyn BindSink>) -> Self {
        Self { id, sink }
    }
    pub fn id(&self) -> EffectId {
        self.id
    }
    pub fn run(&self) {
        self.sink.clone().run()
    }
}

/// Pops the frame pushed by [`enter`] or [`untrack`] when dropped.
#[must_use]
pub(crate) struct ContextGuard {
    id: Option<EffectId>,
}
impl Drop for ContextGuard {
    fn drop(&mut self) {
        let id = self.id;
        let _ = Globals::try_with(|g| g.pop(id));
    }
}

/// Makes `effect` the current effect until the returned guard is dropped.
pub(crate) fn enter(effect: EffectRef) -> ContextGuard {
    let id = Some(effect.id);
    Globals::with(|g| g.push(Frame::Effect(effect)));
    ContextGuard { id }
}

/// Returns the effect that signal reads are currently attributed to.
pub(crate) fn current() -> Option<EffectRef> {
    Globals::with(|g| g.current().cloned())
}

pub(crate) fn is_running(id: EffectId) -> bool {
    Globals::with(|g| g.stack.iter().any(|f| f.id() == Some(id)))
}

/// Returns the id of the effect currently running on this thread.
///
/// Returns `None` outside of any effect, or inside [`untrack`].
pub fn current_effect() -> Option<EffectId> {
    Globals::with(|g| g.current().map(|e| e.id))
}

/// Returns `true` if a signal read at this point would subscribe an effect.
pub fn is_tracking() -> bool {
    current_effect().is_some()
}

/// Call a function without tracking dependencies.
///
/// Signals read inside `f` do not subscribe the running effect.
/// Effects created inside `f` still track their own reads.
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    Globals::with(|g| g.push(Frame::Untracked));
    let _guard = ContextGuard { id: None };
    f()
}
