//! A lightweight cooperative (non-preemptive) round-robin threading core
//! for embedded and bare-metal targets: a fixed pool of Thread Control
//! Blocks, a dispatch loop, and the `schedule`/`service`/`yield_now`/`idle`/
//! `wait`/`notify` surface built on top of it.
//!
//! `no_std` outside of test builds; nothing here allocates on the heap —
//! every per-thread resource, including its stack, lives in the static TCB
//! pool (`src/config.rs::MAX_THREADS` slots of `src/config.rs::MAX_STACK_SIZE`
//! bytes each).
#![cfg_attr(not(test), no_std)]

mod config;
mod context;
mod dispatch;
mod error;
pub mod logging;
mod platform;
mod scheduler;
mod tcb;
mod tick;

pub use config::{DEFAULT_STACK_SIZE, MAX_STACK_SIZE, MAX_THREADS};
pub use dispatch::{current_name, schedule, service, stats, yield_now, SchedulerStats};
pub use error::ScheduleError;
pub use platform::{set_idle_sleep, IdleSleep};
pub use tcb::{ThreadArg, ThreadFn, ThreadId};
pub use tick::{is_tick_over, now, set_clock, Clock, Tick, COOP_MAX_TICK};

#[cfg(feature = "yield-after")]
pub use dispatch::yield_after;

#[cfg(feature = "idle")]
pub use dispatch::idle;

#[cfg(feature = "wait")]
pub use dispatch::{notify, notify_all, wait};
