//! Continuation attachment and dispatch.
//!
//! Both chain operations share one skeleton: allocate the downstream cell
//! (inheriting the upstream execution context), then either install a
//! callback on the pending upstream cell or, if it already resolved, run the
//! dispatch immediately. The dispatch itself honors the upstream cell's
//! executor: with one bound, the body is boxed and submitted; otherwise it
//! runs inline on the resolving thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use cell::{Callback, Cell};
use error::Error;
use future::{Future, IntoFuture};

/// Arranges for `body` to run with the upstream result once it is available,
/// through the upstream executor if one is bound.
///
/// The installed callback only holds a weak reference back to its own cell;
/// the strong edges all point downstream, so an abandoned chain collapses
/// instead of keeping itself alive through its own continuation.
fn attach<T, F>(from: &Arc<Cell<T>>, body: F)
    where T: Send + 'static,
          F: FnOnce(Result<T, Error>) + Send + 'static,
{
    let weak = Arc::downgrade(from);
    let callback: Callback = Box::new(move || {
        if let Some(from) = weak.upgrade() {
            fire(from, body);
        }
    });
    if let Some(callback) = from.install(callback) {
        callback();
    }
}

fn fire<T, F>(from: Arc<Cell<T>>, body: F)
    where T: Send + 'static,
          F: FnOnce(Result<T, Error>) + Send + 'static,
{
    match from.executor() {
        Some(executor) => {
            trace!("re-dispatching continuation through executor");
            executor.execute(Box::new(move || body(from.take())));
        }
        None => body(from.take()),
    }
}

/// Value-transform dispatch: `f` runs on the value path, errors are forwarded
/// untouched.
pub fn then<T, R, F>(from: Arc<Cell<T>>, f: F) -> Future<R::Item>
    where T: Send + 'static,
          R: IntoFuture,
          F: FnOnce(T) -> R + Send + 'static,
{
    let to = Arc::new(Cell::new());
    to.set_executor(from.executor());
    let down = to.clone();
    attach(&from, move |result| {
        match result {
            Ok(value) => run_continuation(&down, move || f(value)),
            Err(error) => {
                down.resolve(Err(error));
            }
        }
    });
    Future::from_cell(to)
}

/// Typed-recovery dispatch: `f` runs when the upstream error captures an `E`,
/// values and other errors are forwarded untouched.
pub fn recover<T, E, R, F>(from: Arc<Cell<T>>, f: F) -> Future<T>
    where T: Send + 'static,
          E: Any + Send,
          R: IntoFuture<Item = T>,
          F: FnOnce(E) -> R + Send + 'static,
{
    let to = Arc::new(Cell::new());
    to.set_executor(from.executor());
    let down = to.clone();
    attach(&from, move |result| {
        match result {
            Ok(value) => {
                down.resolve(Ok(value));
            }
            Err(error) => match error.downcast::<E>() {
                Ok(matched) => run_continuation(&down, move || f(matched)),
                Err(error) => {
                    down.resolve(Err(error));
                }
            },
        }
    });
    Future::from_cell(to)
}

/// Runs a user continuation and routes its outcome into `to`: the returned
/// value is converted through `IntoFuture` and forwarded, a panic is captured
/// as the downstream error.
fn run_continuation<R, F>(to: &Arc<Cell<R::Item>>, f: F)
    where R: IntoFuture,
          F: FnOnce() -> R,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(ret) => forward(ret.into_future(), to),
        Err(payload) => {
            to.resolve(Err(Error::from_payload(payload)));
        }
    }
}

/// Resolves `to` with whatever `from` resolves with. Used to splice a future
/// returned by a continuation into the chain in its place.
fn forward<T>(from: Future<T>, to: &Arc<Cell<T>>)
    where T: Send + 'static,
{
    let to = to.clone();
    attach(&from.into_cell(), move |result| {
        to.resolve(result);
    });
}
