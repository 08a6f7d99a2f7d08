use std::mem;
use std::sync::Mutex;

use super::{Executor, Thunk};

/// An executor whose queue is drained by explicit [`run`] calls.
///
/// Submissions accumulate until some thread calls `run`, which executes the
/// batch in submission order on the calling thread. An application can keep
/// one of these per event loop and call `run` each iteration, letting
/// continuation chains hop onto whichever loop owns the next step.
///
/// [`run`]: #method.run
pub struct ManualExecutor {
    queue: Mutex<Vec<Thunk>>,
}

impl ManualExecutor {
    /// Creates an executor with an empty queue.
    pub fn new() -> ManualExecutor {
        ManualExecutor { queue: Mutex::new(Vec::new()) }
    }

    /// Runs every thunk queued so far on the calling thread, returning how
    /// many ran.
    ///
    /// The queue is swapped out before anything runs, so thunks submitted
    /// during `run` (including by the thunks themselves) land in the next
    /// batch.
    pub fn run(&self) -> usize {
        let todo = mem::replace(&mut *self.queue.lock().unwrap(), Vec::new());
        let count = todo.len();
        if count > 0 {
            trace!("running {} queued thunks", count);
        }
        for thunk in todo {
            thunk();
        }
        count
    }
}

impl Executor for ManualExecutor {
    fn execute(&self, thunk: Thunk) {
        self.queue.lock().unwrap().push(thunk);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::super::Executor;
    use super::ManualExecutor;

    #[test]
    fn run_drains_in_order() {
        let executor = ManualExecutor::new();
        let log = Arc::new(AtomicUsize::new(0));
        for i in 1..4 {
            let log = log.clone();
            executor.execute(Box::new(move || {
                log.store(log.load(Ordering::SeqCst) * 10 + i, Ordering::SeqCst);
            }));
        }
        assert_eq!(executor.run(), 3);
        assert_eq!(log.load(Ordering::SeqCst), 123);
        assert_eq!(executor.run(), 0);
    }

    #[test]
    fn submissions_during_run_wait_for_next_batch() {
        let executor = Arc::new(ManualExecutor::new());
        let inner = executor.clone();
        executor.execute(Box::new(move || {
            inner.execute(Box::new(|| {}));
        }));
        assert_eq!(executor.run(), 1);
        assert_eq!(executor.run(), 1);
        assert_eq!(executor.run(), 0);
    }
}
