// #![include_doc("../README.md", start)]
//! # sigtrack
//!
//! `sigtrack` provides signals and effects with automatic dependency tracking.
//!
//! - [`Signal<T>`]: Similar to `Rc<RefCell<T>>`, but effects that read the value are called again when it is set.
//! - [`effect`]: A function that is called once immediately, and again each time a signal it read is set.
//!
//! An effect does not declare its dependencies. Every signal read while the effect is running subscribes the effect to that signal.
//!
//! ## Example
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use sigtrack::{create_signal, effect};
//!
//! let (count, set_count) = create_signal(1);
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let l = log.clone();
//! effect(move || l.borrow_mut().push(count.get()));
//! assert_eq!(*log.borrow(), vec![1]);
//!
//! set_count.set(2);
//! assert_eq!(*log.borrow(), vec![1, 2]);
//!
//! set_count.set(2);
//! assert_eq!(*log.borrow(), vec![1, 2, 2]);
//! ```
//!
//! ## Behavior
//!
//! - Setting a signal calls every subscribed effect synchronously, before `set` returns.
//! - There is no equality check. Setting the same value calls the effects again.
//! - Subscriptions are never removed. An effect stays subscribed to a signal it read once, even if later runs do not read it.
//! - Effects subscribed while `set` is calling effects are also called by that `set`.
//! - Everything is single-threaded. Each thread tracks its own running effects.
//!
//! ## License
//!
//! Licensed under either of Apache-2.0 or MIT, at your option.
//!
//! [`Signal<T>`]: crate::Signal
//! [`effect`]: crate::effect
// #![include_doc("../README.md", end)]
