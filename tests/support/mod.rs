#![allow(dead_code)]

use std::thread;
use std::time::Duration;

pub fn init_log() {
    let _ = ::env_logger::try_init();
}

/// Polls `cond` for up to ~5 seconds. Used where a test must wait on work
/// scheduled to another thread without a channel to block on.
pub fn eventually<F>(mut cond: F) -> bool
    where F: FnMut() -> bool,
{
    for _ in 0..5000 {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}
