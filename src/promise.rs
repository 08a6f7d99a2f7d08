use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use cell::Cell;
use error::{Canceled, Error};
use executor::Executor;
use future::{Future, IntoFuture};

/// The write half of an eagerly-resolved computation.
///
/// A promise owns the resolution of one cell: exactly one of [`set_value`],
/// [`set_error`], or [`set`] may be called, and each consumes the handle.
/// The matching read half is obtained with [`future`] (or [`future_on`] to
/// bind an execution context at the same time); a promise should hand out at
/// most one.
///
/// Dropping a promise without resolving it publishes a [`Canceled`] error so
/// downstream consumers unblock instead of waiting forever.
///
/// [`set_value`]: #method.set_value
/// [`set_error`]: #method.set_error
/// [`set`]: #method.set
/// [`future`]: #method.future
/// [`future_on`]: #method.future_on
/// [`Canceled`]: struct.Canceled.html
pub struct Promise<T> {
    cell: Arc<Cell<T>>,
}

impl<T> Promise<T>
    where T: Send + 'static,
{
    /// Creates a new, unresolved promise.
    pub fn new() -> Promise<T> {
        Promise { cell: Arc::new(Cell::new()) }
    }

    /// Creates a promise already resolved with `value`.
    pub fn with_value(value: T) -> Promise<T> {
        Promise { cell: Arc::new(Cell::with_result(Ok(value))) }
    }

    /// Returns the read half of this promise.
    pub fn future(&self) -> Future<T> {
        Future::from_cell(self.cell.clone())
    }

    /// Returns the read half of this promise with `executor` bound as its
    /// execution context, so the first continuation attached to it is
    /// dispatched there.
    pub fn future_on(&self, executor: Arc<dyn Executor>) -> Future<T> {
        self.cell.set_executor(Some(executor));
        self.future()
    }

    /// Resolves the promise with a value, firing any attached continuation.
    pub fn set_value(self, value: T) {
        self.resolve(Ok(value));
    }

    /// Resolves the promise with an error.
    ///
    /// Accepts either a raw error value or an existing [`Error`] capture;
    /// the latter is rethrown as-is rather than wrapped again.
    ///
    /// [`Error`]: struct.Error.html
    pub fn set_error<E>(self, error: E)
        where E: Any + Send,
    {
        self.resolve(Err(Error::new(error)));
    }

    /// Invokes `f` and resolves the promise with its outcome.
    ///
    /// A panic inside `f` is captured and published as the error.
    pub fn set<F>(self, f: F)
        where F: FnOnce() -> Result<T, Error>,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => self.resolve(result),
            Err(payload) => self.resolve(Err(Error::from_payload(payload))),
        }
    }

    fn resolve(self, result: Result<T, Error>) {
        let resolved = self.cell.resolve(result);
        debug_assert!(resolved, "promise resolved twice");
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        // No-op on a promise that was resolved (the terminal state wins);
        // otherwise the chain learns it will never get a value.
        self.cell.resolve(Err(Error::new(Canceled)));
    }
}

/// Starts a chain on `executor`: `f` is attached as a then-continuation of a
/// ready unit cell bound to it, so `f` itself already runs on the executor.
///
/// ```
/// use std::sync::Arc;
/// use vow::executor::ThreadPool;
///
/// let pool = Arc::new(ThreadPool::new(2));
/// let future = vow::via(pool.clone(), || Ok(6 * 7));
/// assert_eq!(future.get().unwrap(), 42);
/// ```
pub fn via<R, F>(executor: Arc<dyn Executor>, f: F) -> Future<R::Item>
    where R: IntoFuture,
          F: FnOnce() -> R + Send + 'static,
{
    let promise = Promise::with_value(());
    promise.future_on(executor).then(move |()| f())
}
