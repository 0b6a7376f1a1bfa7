//! Thread Control Block (spec.md §3).

use core::fmt;

use bitflags::bitflags;

use crate::config::MAX_STACK_SIZE;
use crate::context::Context;
use crate::tick::Tick;

/// Opaque per-thread argument, passed straight through to the entry
/// routine. Embedding code typically stashes a pointer or small index in
/// here (cast to/from `usize`) rather than a real pointer, so the pool
/// stays `Send`/`Sync` without unsafe assumptions about what it points to.
pub type ThreadArg = usize;

/// A thread's entry routine.
pub type ThreadFn = fn(ThreadArg);

/// Slot identifier: the index of a TCB within the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(pub usize);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread#{}", self.0)
    }
}

/// Thread lifecycle state (spec.md §3 "Thread state").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// Free pool slot.
    Empty,
    /// Terminated, stack not yet reclaimed (buried beneath a live thread).
    Hole,
    /// Scheduled but not yet entered; no stack carved yet.
    New,
    /// Active; stack exists.
    Run,
    /// Timed sleep.
    #[cfg(feature = "idle")]
    Idle,
    /// Blocked on a semaphore id, with optional timeout.
    #[cfg(feature = "wait")]
    Wait,
}

bitflags! {
    /// Wait-specific flags (spec.md §9 "Bitfield packing"): only the two
    /// booleans matter semantically, packed here purely as a space
    /// optimization the way the original does.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WaitFlags: u8 {
        /// Set by `notify`/`notify_all` when this waiter was woken by a
        /// matching notification rather than a timeout.
        const NOTIFIED = 0b01;
        /// Set when the wait has no timeout (`timeout == 0` at `wait()`).
        const INFINITE = 0b10;
    }
}

/// Per-thread record held in the scheduler's fixed pool (spec.md §3).
pub struct Tcb {
    pub state: ThreadState,
    pub(crate) proc: Option<ThreadFn>,
    pub(crate) arg: ThreadArg,
    pub(crate) name: &'static str,
    pub(crate) stack_sz: usize,
    /// Ordinal position on the (virtual) main stack; 1 = deepest. `0` while
    /// `New`/`Empty`.
    pub depth: usize,
    pub(crate) run_context: Context,
    pub(crate) entry_context: Context,
    #[cfg(feature = "idle")]
    pub(crate) idle_to: Tick,
    pub(crate) switch_tick: Tick,
    #[cfg(feature = "wait")]
    pub(crate) sem_id: u32,
    #[cfg(feature = "wait")]
    pub(crate) wait_to: Tick,
    #[cfg(feature = "wait")]
    pub(crate) wait_flags: WaitFlags,
    pub(crate) stack: [u8; MAX_STACK_SIZE],
}

impl Tcb {
    pub const fn empty() -> Self {
        Tcb {
            state: ThreadState::Empty,
            proc: None,
            arg: 0,
            name: "",
            stack_sz: 0,
            depth: 0,
            run_context: Context::zeroed(),
            entry_context: Context::zeroed(),
            #[cfg(feature = "idle")]
            idle_to: 0,
            switch_tick: 0,
            #[cfg(feature = "wait")]
            sem_id: 0,
            #[cfg(feature = "wait")]
            wait_to: 0,
            #[cfg(feature = "wait")]
            wait_flags: WaitFlags::empty(),
            stack: [0; MAX_STACK_SIZE],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reset a slot back to `Empty`, per §3 "a slot in EMPTY state has
    /// undefined/zeroed fields" — zeroing is cheap insurance for the next
    /// occupant and makes the stack's debug zero-fill (§4.3) meaningful
    /// again.
    pub(crate) fn reset(&mut self) {
        self.state = ThreadState::Empty;
        self.proc = None;
        self.arg = 0;
        self.name = "";
        self.stack_sz = 0;
        self.depth = 0;
        self.run_context = Context::zeroed();
        self.entry_context = Context::zeroed();
        #[cfg(feature = "idle")]
        {
            self.idle_to = 0;
        }
        self.switch_tick = 0;
        #[cfg(feature = "wait")]
        {
            self.sem_id = 0;
            self.wait_to = 0;
            self.wait_flags = WaitFlags::empty();
        }
    }
}

impl fmt::Debug for Tcb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tcb")
            .field("state", &self.state)
            .field("name", &self.name)
            .field("depth", &self.depth)
            .field("stack_sz", &self.stack_sz)
            .finish()
    }
}
