//! P6: `notify` wakes exactly the lowest-index matching waiter; `notify_all`
//! wakes every matching waiter.

#![cfg(feature = "wait")]

mod common;

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

static ORDERED_LOG: Mutex<Vec<(usize, bool)>> = Mutex::new(Vec::new());
static MID_NOTIFY_LOG_LEN: AtomicUsize = AtomicUsize::new(usize::MAX);

fn waiter_n(arg: usize) {
    let woken = coop_sched::wait(42, 0);
    ORDERED_LOG.lock().unwrap().push((arg, woken));
}

/// Notifies once (waking only the lowest-index waiter), observes that the
/// other two are still pending, then notifies everyone left.
fn controller(_arg: usize) {
    coop_sched::notify(42);
    coop_sched::yield_now();
    MID_NOTIFY_LOG_LEN.store(ORDERED_LOG.lock().unwrap().len(), Ordering::SeqCst);
    coop_sched::notify_all(42);
}

#[test]
fn notify_wakes_lowest_index_waiter_only_notify_all_wakes_the_rest() {
    common::init();

    coop_sched::schedule(waiter_n, "w0", 0, 0).expect("schedule w0");
    coop_sched::schedule(waiter_n, "w1", 0, 1).expect("schedule w1");
    coop_sched::schedule(waiter_n, "w2", 0, 2).expect("schedule w2");
    coop_sched::schedule(controller, "controller", 0, 0).expect("schedule controller");
    coop_sched::service();

    assert_eq!(
        MID_NOTIFY_LOG_LEN.load(Ordering::SeqCst),
        1,
        "only the lowest-index waiter (w0) should have woken from the single notify()"
    );

    let log = ORDERED_LOG.lock().unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0], (0, true), "w0 must be woken first, by notify()");
    assert!(log[1..].iter().all(|(_, woken)| *woken), "notify_all must wake every remaining waiter");

    let mut woken_ids: Vec<usize> = log.iter().map(|(id, _)| *id).collect();
    woken_ids.sort();
    assert_eq!(woken_ids, vec![0, 1, 2]);
}
