use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use num_cpus;

use super::{Executor, Thunk};

/// A fixed-size pool of worker threads draining a shared queue.
///
/// Submitted thunks are run in FIFO order by whichever worker wakes up
/// first. Dropping the pool stops the workers and joins them; thunks still
/// queued at that point are drained before the workers exit.
pub struct ThreadPool {
    state: Arc<PoolState>,
    workers: Vec<thread::JoinHandle<()>>,
}

struct PoolState {
    queue: Mutex<Queue>,
    cond: Condvar,
}

struct Queue {
    thunks: VecDeque<Thunk>,
    running: bool,
}

impl ThreadPool {
    /// Creates a pool with `size` worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> ThreadPool {
        assert!(size > 0, "thread pool needs at least one worker");
        let state = Arc::new(PoolState {
            queue: Mutex::new(Queue {
                thunks: VecDeque::new(),
                running: true,
            }),
            cond: Condvar::new(),
        });
        let workers = (0..size)
            .map(|i| {
                let state = state.clone();
                thread::Builder::new()
                    .name(format!("vow-worker-{}", i))
                    .spawn(move || state.work(i))
                    .unwrap()
            })
            .collect();
        ThreadPool {
            state: state,
            workers: workers,
        }
    }

    /// Creates a pool with one worker per logical CPU.
    pub fn new_num_cpus() -> ThreadPool {
        ThreadPool::new(num_cpus::get())
    }
}

impl PoolState {
    fn work(&self, idx: usize) {
        debug!("worker {} started", idx);
        loop {
            let thunk = {
                let mut queue = self.queue.lock().unwrap();
                while queue.running && queue.thunks.is_empty() {
                    queue = self.cond.wait(queue).unwrap();
                }
                match queue.thunks.pop_front() {
                    Some(thunk) => thunk,
                    // Only once shutdown has begun *and* the queue is dry.
                    None => break,
                }
            };
            thunk();
        }
        debug!("worker {} shutting down", idx);
    }
}

impl Executor for ThreadPool {
    fn execute(&self, thunk: Thunk) {
        {
            let mut queue = self.state.queue.lock().unwrap();
            queue.thunks.push_back(thunk);
            trace!("queued thunk ({} pending)", queue.thunks.len());
        }
        self.state.cond.notify_one();
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        {
            let mut queue = self.state.queue.lock().unwrap();
            queue.running = false;
        }
        self.state.cond.notify_all();
        // A thunk can end up holding the last reference to the pool, in
        // which case this destructor runs on a worker; that worker cannot
        // join itself and exits on its own once the destructor returns.
        let current = thread::current().id();
        for worker in self.workers.drain(..) {
            if worker.thread().id() == current {
                continue;
            }
            if worker.join().is_err() {
                debug!("worker thread panicked");
            }
        }
    }
}
