use std::{cell::RefCell, rc::Rc};

use assert_call::{call, CallRecorder};
use sigtrack::{core::current_effect, create_signal, effect, Effect};

#[test]
fn log_values() {
    let (get, set) = create_signal(1);
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = log.clone();
    effect(move || l.borrow_mut().push(get.get()));
    assert_eq!(*log.borrow(), vec![1]);

    set.set(2);
    assert_eq!(*log.borrow(), vec![1, 2]);

    set.set(2);
    assert_eq!(*log.borrow(), vec![1, 2, 2]);
}

#[test]
fn two_effects_rerun_in_registration_order() {
    let mut cr = CallRecorder::new();
    let (get, set) = create_signal(0);
    let g1 = get.clone();
    effect(move || call!("e1:{}", g1.get()));
    let g2 = get.clone();
    effect(move || call!("e2:{}", g2.get()));
    cr.verify(["e1:0", "e2:0"]);

    set.set(5);
    cr.verify(["e1:5", "e2:5"]);
}

#[test]
fn stale_subscription_reruns_effect() {
    let mut cr = CallRecorder::new();
    let (guard, set_guard) = create_signal(true);
    let (a, set_a) = create_signal(1);
    let (b, set_b) = create_signal(10);
    let e = Effect::new(move || {
        if guard.get() {
            call!("a:{}", a.get());
        } else {
            call!("b:{}", b.get());
        }
    });
    cr.verify("a:1");

    set_guard.set(false);
    cr.verify("b:10");

    set_a.set(2);
    cr.verify("b:10");

    set_b.set(11);
    cr.verify("b:11");
    assert_eq!(e.run_count(), 4);
}

#[test]
fn nested_effect_restores_outer() {
    let mut cr = CallRecorder::new();
    let (outer_src, set_outer) = create_signal(0);
    let (inner_src, set_inner) = create_signal(0);
    let (late_src, set_late) = create_signal(0);
    let once = Rc::new(RefCell::new(false));
    effect(move || {
        call!("outer:{}", outer_src.get());
        if !once.replace(true) {
            let inner_src = inner_src.clone();
            effect(move || call!("inner:{}", inner_src.get()));
        }
        call!("late:{}", late_src.get());
    });
    cr.verify(["outer:0", "inner:0", "late:0"]);

    set_inner.set(1);
    cr.verify("inner:1");

    set_late.set(1);
    cr.verify(["outer:0", "late:1"]);

    set_outer.set(1);
    cr.verify(["outer:1", "late:1"]);
}

#[test]
fn chained_effects_complete_before_set_returns() {
    let (a, set_a) = create_signal(1);
    let (b, set_b) = create_signal(0);
    let (c, set_c) = create_signal(0);
    effect(move || set_b.set(a.get() + 1));
    effect(move || set_c.set(b.get() * 2));
    assert_eq!(c.get(), 4);

    set_a.set(5);
    assert_eq!(c.get(), 12);
    assert_eq!(current_effect(), None);
}
