//! Shared test fixtures: a fake tick source and idle-sleep primitive,
//! registered once per test binary (each file under `tests/` compiles to
//! its own process, so this does not leak state across scenario files).

use core::sync::atomic::{AtomicU32, Ordering};

static TICK: AtomicU32 = AtomicU32::new(0);

pub struct FakeClock;

impl coop_sched::Clock for FakeClock {
    fn tick(&self) -> coop_sched::Tick {
        TICK.load(Ordering::SeqCst)
    }
}

static CLOCK: FakeClock = FakeClock;

pub struct FakeIdle;

impl coop_sched::IdleSleep for FakeIdle {
    fn idle(&self, ticks: coop_sched::Tick) {
        advance(ticks);
    }
}

static IDLE: FakeIdle = FakeIdle;

pub fn set_tick(value: u32) {
    TICK.store(value, Ordering::SeqCst);
}

pub fn advance(ticks: u32) {
    TICK.fetch_add(ticks, Ordering::SeqCst);
}

pub fn current_tick() -> u32 {
    TICK.load(Ordering::SeqCst)
}

/// Register the fake clock and idle-sleep primitive. Call once at the top
/// of every scenario test.
pub fn init() {
    coop_sched::logging::init_null();
    coop_sched::set_clock(&CLOCK);
    coop_sched::set_idle_sleep(&IDLE);
}
