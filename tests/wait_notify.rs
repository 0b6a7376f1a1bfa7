//! Scenario 5 (wait/notify), first half: a thread blocked forever on a
//! semaphore id wakes with `true` once another thread notifies it.
//!
//! Each scenario file in this crate's `tests/` directory holds exactly one
//! `#[test]` function. The scheduler is a process-wide singleton
//! (`src/scheduler.rs`), and `cargo test` runs the `#[test]` functions of a
//! single binary concurrently on separate threads by default; two
//! scenarios sharing one binary would race on that singleton. One file per
//! scenario keeps every `cargo test` binary single-scenario, matching
//! `tests/single_thread.rs` and `tests/two_interleaving.rs`.

#![cfg(feature = "wait")]

mod common;

use std::sync::Mutex;

static LOG: Mutex<Vec<bool>> = Mutex::new(Vec::new());

fn waiter(_arg: usize) {
    let woken = coop_sched::wait(7, 0);
    LOG.lock().unwrap().push(woken);
}

fn notifier(_arg: usize) {
    coop_sched::notify(7);
}

#[test]
fn wait_forever_then_notify_returns_true() {
    common::init();

    coop_sched::schedule(waiter, "waiter", 0, 0).expect("schedule waiter");
    coop_sched::schedule(notifier, "notifier", 0, 0).expect("schedule notifier");
    coop_sched::service();

    assert_eq!(*LOG.lock().unwrap(), vec![true]);
}
