//! Scenario 6 (wrap-safe timing): starting `now` ten ticks short of
//! `COOP_MAX_TICK` and idling for 20 ticks must correctly wake the thread
//! after the tick counter wraps, at absolute tick 9 — not hang forever and
//! not wake prematurely before the wrap.

#![cfg(feature = "idle")]

mod common;

use core::sync::atomic::{AtomicBool, Ordering};

static WOKE: AtomicBool = AtomicBool::new(false);

fn sleeper(_arg: usize) {
    coop_sched::idle(20);
    WOKE.store(true, Ordering::SeqCst);
}

#[test]
fn idle_wakes_correctly_across_tick_wraparound() {
    common::init();
    common::set_tick(coop_sched::COOP_MAX_TICK - 10);

    coop_sched::schedule(sleeper, "wrap", 0, 0).expect("schedule wrap");
    coop_sched::service();

    assert!(WOKE.load(Ordering::SeqCst), "thread must wake once the wrapped deadline is reached");
}
