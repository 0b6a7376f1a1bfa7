//! The dispatch state machine: `schedule`, `service`, and the per-iteration
//! decision table of spec.md §4.2, the termination/unwind bookkeeping of
//! §4.5, and system-idle collapsing (§4.4).

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::config::{DEFAULT_STACK_SIZE, MAX_STACK_SIZE};
use crate::context::{jump_context, save_context, Context};
use crate::error::ScheduleError;
use crate::scheduler::{self, Scheduler};
use crate::tcb::{ThreadArg, ThreadFn, ThreadId, ThreadState};
use crate::tick::{self, Tick};

#[cfg(feature = "wait")]
use crate::tcb::WaitFlags;

/// Sentinel meaning "no thread is currently running" (scheduler's own
/// frame). `usize::MAX` can never be a valid pool index.
const NO_SLOT: usize = usize::MAX;

static CURRENT_SLOT: AtomicUsize = AtomicUsize::new(NO_SLOT);

fn current_slot() -> Option<usize> {
    match CURRENT_SLOT.load(Ordering::SeqCst) {
        NO_SLOT => None,
        slot => Some(slot),
    }
}

/// Schedule a new thread (spec.md §4.1). Legal both before `service()`
/// starts and from within a running thread.
pub fn schedule(proc: ThreadFn, name: &'static str, stack_sz: usize, arg: ThreadArg) -> Result<(), ScheduleError> {
    let stack_sz = if stack_sz == 0 { DEFAULT_STACK_SIZE } else { stack_sz };
    if stack_sz > MAX_STACK_SIZE {
        log::warn!("coop_sched: schedule({name}) requested stack_sz {stack_sz} exceeds MAX_STACK_SIZE");
        return Err(ScheduleError::LimitExceeded);
    }

    scheduler::with_scheduler_mut(|s| {
        let Some(slot) = s.first_empty() else {
            log::warn!("coop_sched: schedule({name}) failed, pool exhausted");
            return Err(ScheduleError::LimitExceeded);
        };
        let t = &mut s.pool[slot];
        t.state = ThreadState::New;
        t.proc = Some(proc);
        t.arg = arg;
        t.name = name;
        t.stack_sz = stack_sz;
        s.busy_n += 1;
        log::debug!("coop_sched: scheduled {} as {}", name, ThreadId(slot));
        Ok(())
    })
}

/// The current thread's name, or `""` if called outside any thread
/// (spec.md §4.1 "current_name").
pub fn current_name() -> &'static str {
    match current_slot() {
        Some(slot) => scheduler::with_scheduler(|s| s.pool[slot].name()),
        None => "",
    }
}

/// A snapshot of the scheduler's global counters, grounded on the
/// teacher's `scheduler::get_thread_stats` diagnostic surface — narrowed
/// here to the counters spec.md §3/§8 actually specifies (P2, P3), since
/// this crate's pool carries no per-thread CPU-time accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Count of non-`Empty` slots.
    pub busy_n: usize,
    /// Count of `Hole` slots.
    pub hole_n: usize,
    /// Count of `Idle` slots.
    #[cfg(feature = "idle")]
    pub idle_n: usize,
    /// Current top-of-main-stack ordinal.
    pub depth: usize,
}

/// Snapshot the scheduler's global counters (spec.md §8 P2/P3).
pub fn stats() -> SchedulerStats {
    scheduler::with_scheduler(|s| SchedulerStats {
        busy_n: s.busy_n,
        hole_n: s.hole_n,
        #[cfg(feature = "idle")]
        idle_n: s.idle_n,
        depth: s.depth,
    })
}

/// Run the dispatch loop until every scheduled thread has terminated
/// (spec.md §4.1/§4.2).
pub fn service() {
    loop {
        let busy = scheduler::with_scheduler(|s| s.busy_n);
        if busy == 0 {
            break;
        }
        service_step();
    }
    log::debug!("coop_sched: service() drained, reinitializing scheduler");
    scheduler::reinit();
}

/// One iteration of the dispatch loop: advance `cur_thrd`, collapse system
/// idle if applicable, then act on the selected slot's state.
fn service_step() {
    let slot = scheduler::with_scheduler_mut(|s| {
        let next = s.cur_thrd.map_or(0, |c| (c + 1) % s.pool.len());
        s.cur_thrd = Some(next);
        next
    });

    #[cfg(feature = "idle")]
    collapse_idle_if_needed();

    let state = scheduler::with_scheduler(|s| s.pool[slot].state);
    match state {
        ThreadState::Empty | ThreadState::Hole => {}

        #[cfg(feature = "idle")]
        ThreadState::Idle => {
            let elapsed = scheduler::with_scheduler(|s| {
                tick::is_tick_over(tick::now(), s.pool[slot].idle_to)
            });
            if elapsed {
                scheduler::with_scheduler_mut(|s| {
                    s.pool[slot].state = ThreadState::Run;
                    s.idle_n -= 1;
                });
                enter_slot(slot);
            }
        }

        #[cfg(feature = "wait")]
        ThreadState::Wait => {
            let timed_out = scheduler::with_scheduler(|s| {
                let t = &s.pool[slot];
                !t.wait_flags.contains(WaitFlags::INFINITE) && tick::is_tick_over(tick::now(), t.wait_to)
            });
            if timed_out {
                scheduler::with_scheduler_mut(|s| s.pool[slot].state = ThreadState::Run);
                enter_slot(slot);
            }
        }

        ThreadState::New => enter_new(slot),

        ThreadState::Run => enter_slot(slot),
    }
}

/// NEW → RUN: snapshot `entry_context` for fidelity (never jumped into
/// under the per-thread-stack strategy, see SPEC_FULL.md §2), bootstrap a
/// fresh `run_context` pointing at the trampoline atop this slot's own
/// stack, then switch in exactly like an ordinary resume.
fn enter_new(slot: usize) {
    let entry_ptr = scheduler::with_scheduler_mut(|s| {
        s.depth += 1;
        s.pool[slot].depth = s.depth;
        &mut s.pool[slot].entry_context as *mut Context
    });
    unsafe { save_context(entry_ptr) };
    scheduler::with_scheduler(|s| {
        log::trace!(
            "coop_sched: {} entry_context captured at depth {}: {:?}",
            ThreadId(slot),
            s.pool[slot].depth,
            s.pool[slot].entry_context
        );
    });

    scheduler::with_scheduler_mut(|s| {
        let stack_sz = s.pool[slot].stack_sz;
        s.pool[slot].stack[..stack_sz].fill(0);
        let stack_top = unsafe { s.pool[slot].stack.as_mut_ptr().add(stack_sz) };
        s.pool[slot].run_context = Context::bootstrap(stack_top, thread_trampoline);
        s.pool[slot].state = ThreadState::Run;
    });

    enter_slot(slot);
}

/// Switch control into `slot`'s `run_context`, returning here once that
/// thread yields, waits, idles, or terminates.
fn enter_slot(slot: usize) {
    scheduler::with_scheduler_mut(|s| s.pool[slot].switch_tick = tick::now());
    let (run_ptr, sched_ptr) = scheduler::with_scheduler_mut(|s| {
        (&s.pool[slot].run_context as *const Context, &mut s.sched_context as *mut Context)
    });
    CURRENT_SLOT.store(slot, Ordering::SeqCst);
    unsafe {
        if save_context(sched_ptr) == 0 {
            jump_context(run_ptr, 1);
        }
    }
    CURRENT_SLOT.store(NO_SLOT, Ordering::SeqCst);
}

/// Suspend the calling thread back into the dispatcher, resuming here the
/// next time the dispatcher switches back into this slot.
fn suspend(slot: usize) {
    let (run_ptr, sched_ptr) = scheduler::with_scheduler_mut(|s| {
        (&mut s.pool[slot].run_context as *mut Context, &s.sched_context as *const Context)
    });
    unsafe {
        if save_context(run_ptr) == 0 {
            jump_context(sched_ptr, 1);
        }
    }
}

/// The entry point of every freshly bootstrapped `run_context`. Looks up
/// its own slot via [`CURRENT_SLOT`] (set by [`enter_slot`] just before the
/// jump that first lands here), runs the thread's routine to completion,
/// then folds into the termination path.
extern "C" fn thread_trampoline() -> ! {
    let slot = current_slot().expect("thread_trampoline entered with no current slot recorded");
    let (proc, arg) = scheduler::with_scheduler(|s| {
        let t = &s.pool[slot];
        (t.proc.expect("NEW slot entered with no entry routine"), t.arg)
    });

    proc(arg);

    terminate(slot);
    let sched_ptr = scheduler::with_scheduler(|s| &s.sched_context as *const Context);
    unsafe { jump_context(sched_ptr, 1) }
}

/// Whether a slot is "still started" (spec.md §4.5): alive and occupying
/// its carved stack region. Excludes `Hole` — a hole's depth must not hold
/// the new top-of-stack up, or it would never be reclaimed.
fn is_still_started(state: ThreadState) -> bool {
    match state {
        ThreadState::Run => true,
        #[cfg(feature = "idle")]
        ThreadState::Idle => true,
        #[cfg(feature = "wait")]
        ThreadState::Wait => true,
        ThreadState::Empty | ThreadState::Hole | ThreadState::New => false,
    }
}

/// Termination and unwind bookkeeping (spec.md §4.5): Case A when the
/// terminating slot is buried beneath a still-live thread (becomes a
/// `Hole`), Case B when it is the topmost slot (reclaimed immediately,
/// together with any holes left stranded above the new top).
fn terminate(slot: usize) {
    scheduler::with_scheduler_mut(|s: &mut Scheduler| {
        let my_depth = s.pool[slot].depth;
        if my_depth < s.depth {
            s.pool[slot].state = ThreadState::Hole;
            s.hole_n += 1;
            log::debug!("coop_sched: {} terminated (buried), now a hole", ThreadId(slot));
        } else {
            let name = s.pool[slot].name();
            s.pool[slot].reset();
            s.busy_n -= 1;
            log::debug!("coop_sched: {} terminated ({})", ThreadId(slot), name);

            let new_top = s
                .pool
                .iter()
                .filter(|t| is_still_started(t.state))
                .map(|t| t.depth)
                .max()
                .unwrap_or(0);

            for t in s.pool.iter_mut() {
                if t.state == ThreadState::Hole && t.depth > new_top {
                    t.reset();
                    s.busy_n -= 1;
                    s.hole_n -= 1;
                }
            }
            s.depth = new_top;
        }
    });
}

/// Yield control to the scheduler, resuming the next time this thread's
/// slot is revisited (spec.md §4.6 "yield_now").
pub fn yield_now() {
    match current_slot() {
        Some(slot) => suspend(slot),
        None => log::warn!("coop_sched: yield_now() called outside any thread"),
    }
}

/// Yield only if at least `limit` ticks have elapsed since this thread was
/// last resumed; returns whether it actually yielded (spec.md §4.6
/// "yield_after").
#[cfg(feature = "yield-after")]
pub fn yield_after(limit: Tick) -> bool {
    let Some(slot) = current_slot() else {
        log::warn!("coop_sched: yield_after() called outside any thread");
        return false;
    };
    let due = scheduler::with_scheduler(|s| tick::is_tick_over(tick::now(), s.pool[slot].switch_tick.wrapping_add(limit)));
    if due {
        suspend(slot);
    }
    due
}

/// Suspend the calling thread until at least `period` ticks have passed
/// (spec.md §4.6 "idle").
#[cfg(feature = "idle")]
pub fn idle(period: Tick) {
    let Some(slot) = current_slot() else {
        log::warn!("coop_sched: idle() called outside any thread");
        return;
    };
    scheduler::with_scheduler_mut(|s| {
        s.pool[slot].state = ThreadState::Idle;
        s.pool[slot].idle_to = tick::now().wrapping_add(period);
        s.idle_n += 1;
    });
    suspend(slot);
}

/// Block the calling thread on `sem_id` until `notify`/`notify_all` wakes
/// it, or until `timeout` ticks pass (`timeout == 0` waits forever).
/// Returns `true` if woken by a notification, `false` on timeout.
#[cfg(feature = "wait")]
pub fn wait(sem_id: u32, timeout: Tick) -> bool {
    let Some(slot) = current_slot() else {
        log::warn!("coop_sched: wait() called outside any thread");
        return false;
    };
    scheduler::with_scheduler_mut(|s| {
        let t = &mut s.pool[slot];
        t.state = ThreadState::Wait;
        t.sem_id = sem_id;
        t.wait_flags.remove(WaitFlags::NOTIFIED);
        if timeout == 0 {
            t.wait_flags.insert(WaitFlags::INFINITE);
            t.wait_to = 0;
        } else {
            t.wait_flags.remove(WaitFlags::INFINITE);
            t.wait_to = tick::now().wrapping_add(timeout);
        }
    });
    suspend(slot);
    scheduler::with_scheduler(|s| s.pool[slot].wait_flags.contains(WaitFlags::NOTIFIED))
}

/// Wake the first (lowest-index) thread waiting on `sem_id`, if any
/// (spec.md §4.6 "notify").
#[cfg(feature = "wait")]
pub fn notify(sem_id: u32) {
    scheduler::with_scheduler_mut(|s| {
        if let Some(t) = s
            .pool
            .iter_mut()
            .find(|t| t.state == ThreadState::Wait && t.sem_id == sem_id)
        {
            t.wait_flags.insert(WaitFlags::NOTIFIED);
            t.state = ThreadState::Run;
        }
    });
}

/// Wake every thread waiting on `sem_id` (spec.md §4.6 "notify_all").
#[cfg(feature = "wait")]
pub fn notify_all(sem_id: u32) {
    scheduler::with_scheduler_mut(|s| {
        for t in s.pool.iter_mut() {
            if t.state == ThreadState::Wait && t.sem_id == sem_id {
                t.wait_flags.insert(WaitFlags::NOTIFIED);
                t.state = ThreadState::Run;
            }
        }
    });
}

/// System-idle collapsing (spec.md §4.4): while every non-hole, non-empty
/// slot is `Idle`, sleep the platform for the nearest wakeup instead of
/// spinning the dispatch loop, then promote elapsed slots back to `Run`.
#[cfg(feature = "idle")]
fn collapse_idle_if_needed() {
    loop {
        let now = tick::now();
        let (active, idle_count, min_remaining) = scheduler::with_scheduler(|s| {
            let mut active = 0usize;
            let mut idle_count = 0usize;
            let mut min_remaining: Option<Tick> = None;
            for t in s.pool.iter() {
                match t.state {
                    ThreadState::Run => active += 1,
                    #[cfg(feature = "wait")]
                    ThreadState::Wait => active += 1,
                    ThreadState::Idle => {
                        active += 1;
                        idle_count += 1;
                        if !tick::is_tick_over(now, t.idle_to) {
                            let remaining = t.idle_to.wrapping_sub(now);
                            min_remaining = Some(min_remaining.map_or(remaining, |m| m.min(remaining)));
                        }
                    }
                    _ => {}
                }
            }
            (active, idle_count, min_remaining)
        });

        if active == 0 || idle_count != active {
            return;
        }

        if let Some(ticks) = min_remaining.filter(|&t| t > 0) {
            crate::platform::idle(ticks);
        }

        let promoted = scheduler::with_scheduler_mut(|s| {
            let now = tick::now();
            let mut any = false;
            let pool = &mut s.pool;
            let idle_n = &mut s.idle_n;
            for t in pool.iter_mut() {
                if t.state == ThreadState::Idle && tick::is_tick_over(now, t.idle_to) {
                    t.state = ThreadState::Run;
                    *idle_n -= 1;
                    any = true;
                }
            }
            any
        });
        if promoted {
            return;
        }
    }
}
