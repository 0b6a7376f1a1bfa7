//! spec.md §4.6 "notify": notifications issued when no slot is waiting are
//! silently discarded (no queueing) and have no effect on a later, unrelated
//! waiter on the same semaphore id.

#![cfg(feature = "wait")]

mod common;

use std::sync::Mutex;

static LOG: Mutex<Vec<bool>> = Mutex::new(Vec::new());

fn late_waiter(_arg: usize) {
    let woken = coop_sched::wait(999, 5);
    LOG.lock().unwrap().push(woken);
}

fn late_ticker(_arg: usize) {
    for _ in 0..10 {
        common::advance(1);
        coop_sched::yield_now();
    }
}

#[test]
fn notify_with_no_waiter_is_silently_discarded() {
    common::init();
    common::set_tick(0);

    // Neither call has a matching waiter yet; both must be no-ops.
    coop_sched::notify(999);
    coop_sched::notify_all(999);

    coop_sched::schedule(late_waiter, "late", 0, 0).expect("schedule late");
    coop_sched::schedule(late_ticker, "late_ticker", 0, 0).expect("schedule late_ticker");
    coop_sched::service();

    assert_eq!(*LOG.lock().unwrap(), vec![false], "stale notifications must not be queued");
}
