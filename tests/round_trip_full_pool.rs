//! R1: scheduling `MAX_THREADS` threads that each immediately return leaves
//! the pool empty and `service()` terminates.

mod common;

fn noop(_arg: usize) {}

#[test]
fn filling_the_pool_with_immediately_returning_threads_drains_cleanly() {
    common::init();

    for i in 0..coop_sched::MAX_THREADS {
        coop_sched::schedule(noop, "noop", 0, i).expect("pool should accept up to MAX_THREADS threads");
    }

    // The pool is exactly full: one more must fail with LimitExceeded.
    let over_limit = coop_sched::schedule(noop, "noop", 0, 0);
    assert_eq!(over_limit, Err(coop_sched::ScheduleError::LimitExceeded));

    coop_sched::service();

    let stats = coop_sched::stats();
    assert_eq!(stats.busy_n, 0, "P4: pool must be fully empty after service() drains");
    assert_eq!(stats.hole_n, 0);
    assert_eq!(stats.depth, 0);

    // The singleton was reinitialized by the drain, so the pool accepts a
    // fresh full batch again.
    for i in 0..coop_sched::MAX_THREADS {
        coop_sched::schedule(noop, "noop", 0, i).expect("pool should be usable again after drain");
    }
    coop_sched::service();
    assert_eq!(coop_sched::stats().busy_n, 0);
}
