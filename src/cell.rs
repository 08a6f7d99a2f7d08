//! The shared state backing one link of a continuation chain.
//!
//! Every `Promise`/`Future` pair, and every link created by `then`/`error`,
//! owns exactly one `Cell` through `Arc` handles. A cell starts pending,
//! transitions exactly once to a value or an error, and carries at most one
//! continuation callback plus an optional execution context for it.

use std::mem;
use std::sync::{Arc, Condvar, Mutex};

use error::Error;
use executor::Executor;

/// The continuation slot. Installed at most once while pending; the resolving
/// thread extracts and invokes it exactly once.
pub type Callback = Box<dyn FnOnce() + Send>;

pub struct Cell<T> {
    inner: Mutex<Inner<T>>,
    cond: Condvar,
}

struct Inner<T> {
    state: State<T>,
    executor: Option<Arc<dyn Executor>>,
}

impl<T> Inner<T> {
    fn is_pending(&self) -> bool {
        match self.state {
            State::Pending { .. } => true,
            State::Done(..) => false,
        }
    }
}

enum State<T> {
    Pending { callback: Option<Callback> },
    // The inner `Option` lets the single consumer (a fired continuation or a
    // blocking `get`) move the result out; readiness queries report on the
    // untaken result.
    Done(Option<Result<T, Error>>),
}

impl<T> Cell<T> {
    pub fn new() -> Cell<T> {
        Cell {
            inner: Mutex::new(Inner {
                state: State::Pending { callback: None },
                executor: None,
            }),
            cond: Condvar::new(),
        }
    }

    pub fn with_result(result: Result<T, Error>) -> Cell<T> {
        Cell {
            inner: Mutex::new(Inner {
                state: State::Done(Some(result)),
                executor: None,
            }),
            cond: Condvar::new(),
        }
    }

    /// Publishes the terminal state. Returns `false`, leaving the cell
    /// untouched, if it was already resolved.
    ///
    /// The lock is released before the extracted callback runs: the callback
    /// may attach further continuations, take other cells' locks, or submit
    /// to an executor.
    pub fn resolve(&self, result: Result<T, Error>) -> bool {
        let callback = {
            let mut inner = self.inner.lock().unwrap();
            match inner.state {
                State::Pending { .. } => {}
                State::Done(..) => return false,
            }
            match mem::replace(&mut inner.state, State::Done(Some(result))) {
                State::Pending { callback } => callback,
                State::Done(..) => unreachable!(),
            }
        };
        self.cond.notify_all();
        if let Some(callback) = callback {
            callback();
        }
        true
    }

    /// Installs the continuation callback, or hands it back if the cell is
    /// already resolved so the caller can run it without the lock held.
    pub fn install(&self, callback: Callback) -> Option<Callback> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            State::Pending { callback: ref mut slot } => {
                debug_assert!(slot.is_none(),
                              "second continuation attached to the same future");
                *slot = Some(callback);
                None
            }
            State::Done(..) => Some(callback),
        }
    }

    /// Moves the result out of a resolved cell.
    pub fn take(&self) -> Result<T, Error> {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            State::Done(ref mut result) => {
                result.take().expect("future result taken twice")
            }
            State::Pending { .. } => panic!("future not resolved"),
        }
    }

    /// Blocks until the cell resolves, then moves the result out.
    pub fn wait(&self) -> Result<T, Error> {
        let mut inner = self.inner.lock().unwrap();
        while inner.is_pending() {
            inner = self.cond.wait(inner).unwrap();
        }
        match inner.state {
            State::Done(ref mut result) => {
                result.take().expect("future result taken twice")
            }
            State::Pending { .. } => unreachable!(),
        }
    }

    pub fn is_ready(&self) -> bool {
        match self.inner.lock().unwrap().state {
            State::Done(..) => true,
            State::Pending { .. } => false,
        }
    }

    pub fn has_value(&self) -> bool {
        match self.inner.lock().unwrap().state {
            State::Done(Some(Ok(..))) => true,
            _ => false,
        }
    }

    pub fn has_error(&self) -> bool {
        match self.inner.lock().unwrap().state {
            State::Done(Some(Err(..))) => true,
            _ => false,
        }
    }

    pub fn executor(&self) -> Option<Arc<dyn Executor>> {
        self.inner.lock().unwrap().executor.clone()
    }

    pub fn set_executor(&self, executor: Option<Arc<dyn Executor>>) {
        self.inner.lock().unwrap().executor = executor;
    }
}

#[cfg(test)]
mod tests {
    use super::Cell;
    use error::Error;

    #[test]
    fn single_shot_resolution() {
        let cell = Cell::new();
        assert!(!cell.is_ready());
        assert!(cell.resolve(Ok(1)));
        assert!(!cell.resolve(Ok(2)));
        assert!(cell.has_value());
        assert_eq!(cell.take().unwrap(), 1);
    }

    #[test]
    fn error_state() {
        let cell = Cell::<i32>::new();
        cell.resolve(Err(Error::new("nope")));
        assert!(cell.is_ready());
        assert!(cell.has_error());
        assert!(!cell.has_value());
    }

    #[test]
    fn callback_fires_on_resolution() {
        use std::sync::mpsc;

        let cell = Cell::new();
        let (tx, rx) = mpsc::channel();
        assert!(cell.install(Box::new(move || tx.send(()).unwrap())).is_none());
        cell.resolve(Ok(1));
        rx.try_recv().unwrap();
    }

    #[test]
    fn install_after_resolution_hands_back() {
        let cell = Cell::new();
        cell.resolve(Ok(1));
        let callback = cell.install(Box::new(|| {})).expect("cell was resolved");
        callback();
    }
}
