//! The platform idle-sleep primitive (spec.md §6 `idle_cb`): an external
//! collaborator registered once by the embedding application, the same way
//! [`crate::tick::set_clock`] registers the tick source.

use spin::Mutex;

use crate::tick::Tick;

/// Platform sleep for up to the given number of ticks; may return early.
pub trait IdleSleep: Sync {
    fn idle(&self, ticks: Tick);
}

static IDLE_SLEEP: Mutex<Option<&'static dyn IdleSleep>> = Mutex::new(None);

/// Register the platform's idle-sleep primitive. Only consulted by the
/// `idle` feature's system-idle collapsing (spec.md §4.4).
pub fn set_idle_sleep(sleep: &'static dyn IdleSleep) {
    *IDLE_SLEEP.lock() = Some(sleep);
}

pub(crate) fn idle(ticks: Tick) {
    match *IDLE_SLEEP.lock() {
        Some(sleep) => sleep.idle(ticks),
        None => log::warn!("coop_sched: idle({ticks}) called with no IdleSleep registered"),
    }
}
