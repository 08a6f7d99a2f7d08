use std::any::Any;
use std::fmt;
use std::sync::Arc;

use cell::Cell;
use chain;
use error::Error;
use executor::Executor;

/// The read half of an eagerly-resolved computation.
///
/// A `Future` observes exactly one cell: the blocking [`get`] consumes the
/// handle and returns the cell's result, while [`then`] and [`error`] consume
/// the handle and return a new one observing the downstream cell. At most one
/// continuation may ever be attached to a given cell, so a chain is a line,
/// not a tree; attach the next step to the future returned by the previous
/// one.
///
/// Dropping a `Future` does not cancel anything upstream; the producer still
/// resolves, and the abandoned cell is simply collected.
///
/// [`get`]: #method.get
/// [`then`]: #method.then
/// [`error`]: #method.error
pub struct Future<T> {
    cell: Arc<Cell<T>>,
}

impl<T> Future<T>
    where T: Send + 'static,
{
    pub(crate) fn from_cell(cell: Arc<Cell<T>>) -> Future<T> {
        Future { cell: cell }
    }

    pub(crate) fn into_cell(self) -> Arc<Cell<T>> {
        self.cell
    }

    /// Blocks until the chain resolves this future, then returns the value
    /// or the error capture.
    pub fn get(self) -> Result<T, Error> {
        self.cell.wait()
    }

    /// Returns whether the future has resolved, to either a value or an
    /// error.
    pub fn is_ready(&self) -> bool {
        self.cell.is_ready()
    }

    /// Returns whether the future has resolved to a value.
    pub fn has_value(&self) -> bool {
        self.cell.has_value()
    }

    /// Returns whether the future has resolved to an error.
    pub fn has_error(&self) -> bool {
        self.cell.has_error()
    }

    /// Rebinds this future's execution context and returns it for further
    /// chaining.
    ///
    /// The context applies to the next continuation attached to *this*
    /// future; upstream links keep whatever context they were built with, so
    /// a chain can hop between executors mid-stream.
    pub fn via(self, executor: Arc<dyn Executor>) -> Future<T> {
        self.cell.set_executor(Some(executor));
        self
    }

    /// Attaches a transformation of the eventual value.
    ///
    /// `f` runs once the chain reaches this link with a value; its return
    /// shape decides how the returned future resolves: `Ok(v)`/`Err(e)`
    /// resolve it directly, `()` resolves it with unit, and another `Future`
    /// is spliced in, resolving the returned future with its eventual result.
    /// A panic inside `f` is captured as the downstream error.
    ///
    /// If the chain reaches this link with an error, `f` is not invoked and
    /// the error flows through unchanged.
    pub fn then<R, F>(self, f: F) -> Future<R::Item>
        where R: IntoFuture,
              F: FnOnce(T) -> R + Send + 'static,
    {
        chain::then(self.cell, f)
    }

    /// Attaches a typed recovery handler.
    ///
    /// If the chain reaches this link with an error capturing an `E`, the
    /// captured value is moved into `f` and the handler's return shape
    /// resolves the returned future exactly as in [`then`]. An error of any
    /// other type, or a value, flows through unchanged. Stacking several
    /// `error` calls tries each handler type in order, and the first match
    /// recovers the chain. Taking [`Error`] itself as the parameter type
    /// matches every error and receives the raw capture.
    ///
    /// [`then`]: #method.then
    /// [`Error`]: struct.Error.html
    pub fn error<E, R, F>(self, f: F) -> Future<T>
        where E: Any + Send,
              R: IntoFuture<Item = T>,
              F: FnOnce(E) -> R + Send + 'static,
    {
        chain::recover(self.cell, f)
    }
}

impl<T> fmt::Debug for Future<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Future")
            .field("ready", &self.cell.is_ready())
            .finish()
    }
}

/// Conversion of a continuation's return value into a `Future`.
///
/// This is the witness for the three return shapes a continuation may have:
/// unit, a plain outcome (`Result`), or another future to splice into the
/// chain. Continuation-accepting methods are generic over it so one dispatch
/// path serves all three shapes.
pub trait IntoFuture {
    /// The value type of the resulting future.
    type Item: Send + 'static;

    /// Consumes this value, producing a future.
    fn into_future(self) -> Future<Self::Item>;
}

impl<T> IntoFuture for Future<T>
    where T: Send + 'static,
{
    type Item = T;

    fn into_future(self) -> Future<T> {
        self
    }
}

impl<T> IntoFuture for Result<T, Error>
    where T: Send + 'static,
{
    type Item = T;

    fn into_future(self) -> Future<T> {
        Future::from_cell(Arc::new(Cell::with_result(self)))
    }
}

impl IntoFuture for () {
    type Item = ();

    fn into_future(self) -> Future<()> {
        Ok(()).into_future()
    }
}
