extern crate env_logger;
extern crate vow;

use std::sync::mpsc;

use vow::{Error, Promise};

mod support;
use support::init_log;

#[test]
fn get_on_ready_value() {
    init_log();
    let promise = Promise::with_value(42);
    assert_eq!(promise.future().get().unwrap(), 42);
}

#[test]
fn then_on_ready_value_runs_inline() {
    init_log();
    let promise = Promise::with_value(43);
    let (tx, rx) = mpsc::channel();
    promise.future().then(move |v: i32| {
        tx.send(v).unwrap();
    });
    // No executor bound, so the continuation already ran on this thread.
    assert_eq!(rx.try_recv().unwrap(), 43);
}

#[test]
fn then_before_resolution_fires_on_set() {
    init_log();
    let promise = Promise::new();
    let (tx, rx) = mpsc::channel();
    let tail = promise.future().then(move |v: i32| {
        tx.send(v).unwrap();
    });
    assert!(rx.try_recv().is_err());
    assert!(!tail.is_ready());
    promise.set_value(44);
    assert_eq!(rx.try_recv().unwrap(), 44);
    assert!(tail.has_value());
}

#[test]
fn chained_transforms() {
    init_log();
    let promise = Promise::new();
    let tail = promise
        .future()
        .then(|v: i32| Ok(v + 1))
        .then(|v| Ok(v + 1));
    promise.set_value(44);
    assert_eq!(tail.get().unwrap(), 46);
}

#[test]
fn readiness_queries() {
    init_log();
    let promise = Promise::new();
    let future = promise.future();
    assert!(!future.is_ready());
    assert!(!future.has_value());
    assert!(!future.has_error());
    promise.set_value(1);
    assert!(future.is_ready());
    assert!(future.has_value());
    assert!(!future.has_error());
    assert_eq!(future.get().unwrap(), 1);
}

#[test]
fn unit_chain() {
    init_log();
    let promise = Promise::new();
    let (tx, rx) = mpsc::channel();
    let tail = promise
        .future()
        .then(move |()| {
            tx.send(()).unwrap();
        })
        .then(|()| Ok("done"));
    promise.set_value(());
    rx.try_recv().unwrap();
    assert_eq!(tail.get().unwrap(), "done");
}

#[test]
fn move_only_value_through_chain() {
    init_log();
    let promise = Promise::new();
    let tail = promise
        .future()
        .then(|mut b: Box<i32>| {
            *b += 1;
            Ok(b)
        })
        .then(|mut b| {
            *b += 1;
            Ok(b)
        });
    promise.set_value(Box::new(1));
    assert_eq!(*tail.get().unwrap(), 3);
}

#[test]
fn set_publishes_closure_outcome() {
    init_log();
    let promise = Promise::new();
    let future = promise.future();
    promise.set(|| Ok(5));
    assert_eq!(future.get().unwrap(), 5);

    let promise = Promise::<i32>::new();
    let future = promise.future();
    promise.set(|| Err(Error::new("broken")));
    let err = future.get().unwrap_err();
    assert_eq!(err.downcast::<&'static str>().unwrap(), "broken");
}

#[test]
fn continuations_fire_in_attach_order() {
    init_log();
    let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let promise = Promise::new();
    let mut future = promise.future();
    for step in 0..5 {
        let order = order.clone();
        future = future.then(move |v: i32| {
            order.lock().unwrap().push(step);
            Ok(v)
        });
    }
    promise.set_value(0);
    assert_eq!(future.get().unwrap(), 0);
    assert_eq!(*order.lock().unwrap(), [0, 1, 2, 3, 4]);
}

#[test]
fn value_visible_to_continuation_attached_after_resolution() {
    init_log();
    let promise = Promise::new();
    let future = promise.future();
    promise.set_value(7);
    let (tx, rx) = mpsc::channel();
    future.then(move |v: i32| {
        tx.send(v).unwrap();
    });
    assert_eq!(rx.try_recv().unwrap(), 7);
}
