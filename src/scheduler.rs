//! Scheduler state: the fixed TCB pool plus the global counters and saved
//! scheduler context (spec.md §3 "Scheduler state").

use spin::{Mutex, MutexGuard};

use crate::config::MAX_THREADS;
use crate::context::Context;
use crate::tcb::{Tcb, ThreadState};

/// The scheduler is a process-wide singleton (spec.md §5, §9 "Global
/// singleton"): exactly one instance exists, created on first use and
/// reset after `service()` drains.
static SCHEDULER: Mutex<Option<Scheduler>> = Mutex::new(None);

pub struct Scheduler {
    pub(crate) pool: [Tcb; MAX_THREADS],
    /// Index of the currently selected slot; `None` before the first
    /// dispatch (spec.md §3 "cur_thrd ... sentinel").
    pub(crate) cur_thrd: Option<usize>,
    pub(crate) busy_n: usize,
    pub(crate) hole_n: usize,
    #[cfg(feature = "idle")]
    pub(crate) idle_n: usize,
    /// Current top-of-main-stack ordinal.
    pub(crate) depth: usize,
    pub(crate) sched_context: Context,
}

impl Scheduler {
    fn new() -> Self {
        Scheduler {
            pool: core::array::from_fn(|_| Tcb::empty()),
            cur_thrd: None,
            busy_n: 0,
            hole_n: 0,
            #[cfg(feature = "idle")]
            idle_n: 0,
            depth: 0,
            sched_context: Context::zeroed(),
        }
    }

    /// Find the first `Empty` slot, if any.
    pub(crate) fn first_empty(&self) -> Option<usize> {
        self.pool.iter().position(|t| t.state == ThreadState::Empty)
    }
}

/// Ensure the singleton exists, creating it on first use (spec.md §9).
fn ensure_init() {
    let mut guard = SCHEDULER.lock();
    if guard.is_none() {
        log::debug!("coop_sched: initializing scheduler singleton");
        *guard = Some(Scheduler::new());
    }
}

/// Drop back to an empty, freshly initialized singleton. Called once
/// `service()` observes `busy_n == 0` (spec.md §4.1 "force-reinitializes
/// scheduler state").
pub(crate) fn reinit() {
    *SCHEDULER.lock() = Some(Scheduler::new());
}

/// Mask interrupts for the duration of `f`, the way the teacher guards
/// thread-table mutation in `scheduler/thread.rs::ThreadManager::spawn`:
/// the scheduling model is single-threaded cooperative, but on real
/// hardware an interrupt handler could still observe the pool
/// mid-mutation unless masked. `cli`/`sti` are privileged instructions, so
/// this is a no-op under `cargo test`, where the harness runs unprivileged.
#[cfg(not(test))]
fn critical_section<R>(f: impl FnOnce() -> R) -> R {
    x86_64::instructions::interrupts::without_interrupts(f)
}

#[cfg(test)]
fn critical_section<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Run `f` with exclusive access to the scheduler, initializing it first
/// if this is the first call in the process.
pub(crate) fn with_scheduler_mut<R>(f: impl FnOnce(&mut Scheduler) -> R) -> R {
    ensure_init();
    critical_section(|| {
        let mut guard: MutexGuard<Option<Scheduler>> = SCHEDULER.lock();
        f(guard.as_mut().expect("scheduler singleton just initialized"))
    })
}

/// Shared-reference variant of [`with_scheduler_mut`].
pub(crate) fn with_scheduler<R>(f: impl FnOnce(&Scheduler) -> R) -> R {
    ensure_init();
    critical_section(|| {
        let guard: MutexGuard<Option<Scheduler>> = SCHEDULER.lock();
        f(guard.as_ref().expect("scheduler singleton just initialized"))
    })
}
