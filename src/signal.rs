use std::{cell::RefCell, rc::Rc};

use derive_ex::derive_ex;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{current, EffectId, EffectRef};


/// Create a signal and return its read and write accessors.
///
/// Both accessors refer to the same value.
pub fn create_signal<T: 'static>(value: T) -> (ReadSignal<T>, WriteSignal<T>) {
    Signal::new(value).split()
}

/// Similar to `Rc<RefCell<T>>`, but effects that read the value are called again when it is set.
#[derive_ex(Clone, bound())]
pub struct Signal<T: 'static>(Rc<SignalNode<T>>);

impl<T: 'static> Signal<T> {
    /// Create a new `Signal` with the given initial value.
    pub fn new(value: T) -> Self {
        Self(Rc::new(SignalNode {
            value: RefCell::new(value),
            sinks: RefCell::new(SinkBindings::new()),
        }))
    }

    /// Gets the current value and subscribes the running effect, if any.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.get()
    }

    /// Calls `f` with a reference to the current value and subscribes the running effect, if any.
    ///
    /// Setting this signal from inside `f` panics.
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        self.0.with(f)
    }

    /// Gets the current value without subscribing anything.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.value.borrow().clone()
    }

    /// Calls `f` with a reference to the current value without subscribing anything.
    pub fn with_untracked<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        f(&*self.0.value.borrow())
    }

    /// Sets the value and calls every subscribed effect before returning.
    ///
    /// Effects are called even if `value` equals the current value.
    /// An effect that subscribes while the effects are being called is also called by this `set`.
    pub fn set(&self, value: T) {
        self.0.set(value)
    }

    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal(self.clone())
    }
    pub fn write_only(&self) -> WriteSignal<T> {
        WriteSignal(self.clone())
    }
    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (self.read_only(), WriteSignal(self))
    }

    /// Number of effects subscribed to this signal.
    pub fn subscriber_count(&self) -> usize {
        self.0.sinks.borrow().len()
    }

    /// Ids of the subscribed effects, in the order they first subscribed.
    pub fn subscribers(&self) -> Vec<EffectId> {
        self.0.sinks.borrow().ids()
    }

    pub fn is_subscribed(&self, id: EffectId) -> bool {
        self.0.sinks.borrow().contains(id)
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt_debug(f)
    }
}
impl<T> Serialize for Signal<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        self.0.serialize_value(serializer)
    }
}
impl<'de, T> Deserialize<'de> for Signal<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Signal<T>, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(|value| Signal::new(value))
    }
}

/// Read accessor of a signal.
#[derive_ex(Clone, bound())]
pub struct ReadSignal<T: 'static>(Signal<T>);

impl<T: 'static> ReadSignal<T> {
    /// Gets the current value and subscribes the running effect, if any.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.get()
    }
    /// See [`Signal::with`].
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        self.0.with(f)
    }
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.get_untracked()
    }
    pub fn with_untracked<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        self.0.with_untracked(f)
    }
    pub fn subscriber_count(&self) -> usize {
        self.0.subscriber_count()
    }
    pub fn subscribers(&self) -> Vec<EffectId> {
        self.0.subscribers()
    }
    pub fn is_subscribed(&self, id: EffectId) -> bool {
        self.0.is_subscribed(id)
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}
impl<T> Serialize for ReadSignal<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// Write accessor of a signal.
#[derive_ex(Clone, bound())]
pub struct WriteSignal<T: 'static>(Signal<T>);

impl<T: 'static> WriteSignal<T> {
    /// See [`Signal::set`].
    pub fn set(&self, value: T) {
        self.0.set(value)
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

struct SignalNode<T: 'static> {
    value: RefCell<T>,
    sinks: RefCell<SinkBindings>,
}
impl<T: 'static> SignalNode<T> {
    fn bind(&self) {
        if let Some(effect) = current() {
            self.sinks.borrow_mut().bind(effect);
        }
    }
    fn get(&self) -> T
    where
        T: Clone,
    {
        self.bind();
        self.value.borrow().clone()
    }
    fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        self.bind();
        f(&*self.value.borrow())
    }
    fn set(&self, value: T) {
        match self.value.try_borrow_mut() {
            Ok(mut this_value) => *this_value = value,
            Err(_) => panic!("`Signal` value is borrowed while being set."),
        }
        self.notify();
    }
    fn notify(&self) {
        trace!(subscribers = self.sinks.borrow().len(), "notify signal subscribers");
        let mut index = 0;
        loop {
            let sink = self.sinks.borrow().get(index);
            let Some(sink) = sink else {
                break;
            };
            sink.run();
            index += 1;
        }
    }
    fn fmt_debug(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
    where
        T: std::fmt::Debug,
    {
        match self.value.try_borrow() {
            Ok(value) => std::fmt::Debug::fmt(&*value, f),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
    fn serialize_value<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: serde::ser::Serializer,
    {
        match self.value.try_borrow() {
            Ok(value) => T::serialize(&*value, serializer),
            Err(_) => Err(serde::ser::Error::custom("borrowed")),
        }
    }
}

/// Effects subscribed to a signal, in order of first subscription.
///
/// Entries are never removed.
struct SinkBindings(IndexMap<EffectId, EffectRef>);

impl SinkBindings {
    fn new() -> Self {
        Self(IndexMap::new())
    }
    fn bind(&mut self, effect: EffectRef) {
        self.0.entry(effect.id()).or_insert(effect);
    }
    fn len(&self) -> usize {
        self.0.len()
    }
    fn contains(&self, id: EffectId) -> bool {
        self.0.contains_key(&id)
    }
    fn ids(&self) -> Vec<EffectId> {
        self.0.keys().copied().collect()
    }

    fn get(&self, index: usize) -> Option<EffectRef> {
        self.0.get_index(index).map(|(_, e)| e.clone())
    }
}
