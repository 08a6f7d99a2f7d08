//! Eagerly-resolved promises and futures for multithreaded Rust.
//!
//! This library is an implementation of eager futures: a [`Promise`] is the
//! write half of a computation happening elsewhere, a [`Future`] is the read
//! half, and continuations attached through [`Future::then`] and
//! [`Future::error`] run as soon as the promise is resolved. There is no
//! polling and no task runtime; continuations run on the thread that resolves
//! the promise, or on an execution context chosen with [`Future::via`].
//!
//! Each link of a continuation chain is backed by its own shared cell holding
//! one of pending/value/error. Resolving a cell is a single-shot operation:
//! the value (or error) is published, blocked `get` calls wake up, and the
//! attached continuation fires exactly once.
//!
//! # Examples
//!
//! ```
//! use vow::Promise;
//!
//! let promise = Promise::new();
//! let future = promise
//!     .future()
//!     .then(|v: i32| Ok(v + 1))
//!     .then(|v| Ok(v * 2));
//! promise.set_value(20);
//! assert_eq!(future.get().unwrap(), 42);
//! ```
//!
//! Errors ride the same chain as opaque [`Error`] captures and are recovered
//! by type:
//!
//! ```
//! use vow::{Error, Promise};
//!
//! #[derive(Debug)]
//! struct TooSmall(i32);
//!
//! let promise = Promise::new();
//! let future = promise
//!     .future()
//!     .then(|v: i32| if v < 10 { Err(Error::new(TooSmall(v))) } else { Ok(v) })
//!     .error(|TooSmall(v): TooSmall| Ok(v + 100));
//! promise.set_value(3);
//! assert_eq!(future.get().unwrap(), 103);
//! ```
//!
//! To run continuations somewhere other than the resolving thread, bind an
//! execution context:
//!
//! ```
//! use std::sync::Arc;
//! use vow::executor::ThreadPool;
//! use vow::Promise;
//!
//! let pool = Arc::new(ThreadPool::new(4));
//! let promise = Promise::new();
//! let future = promise.future_on(pool.clone()).then(|v: i32| Ok(v + 1));
//! promise.set_value(1);
//! assert_eq!(future.get().unwrap(), 2);
//! ```
//!
//! [`Promise`]: struct.Promise.html
//! [`Future`]: struct.Future.html
//! [`Future::then`]: struct.Future.html#method.then
//! [`Future::error`]: struct.Future.html#method.error
//! [`Future::via`]: struct.Future.html#method.via
//! [`Error`]: struct.Error.html

#![deny(missing_docs)]

#[macro_use]
extern crate log;
extern crate num_cpus;

mod cell;
mod chain;
mod error;
mod future;
mod promise;

pub mod executor;

pub use error::{Canceled, Error};
pub use executor::Executor;
pub use future::{Future, IntoFuture};
pub use promise::{via, Promise};
