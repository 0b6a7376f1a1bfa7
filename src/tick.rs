//! Monotonic tick abstraction with wrap-safe comparison (spec.md §3, §6).
//!
//! The tick source itself is an external collaborator (spec.md §6): an
//! embedding application registers one with [`set_clock`]. Everything in
//! this module beyond that registration — in particular [`is_tick_over`] —
//! is specified precisely enough by spec.md §4.2 that it belongs in the
//! core, not the platform layer.

use spin::Mutex;

/// An abstract monotonic time unit provided by the host; may wrap.
pub type Tick = u32;

/// The maximum representable tick value.
pub const COOP_MAX_TICK: Tick = Tick::MAX;

/// Wrap-safe "is tick `limit` no longer in the future relative to `reference`".
///
/// Tolerates modular wrap over a window of `COOP_MAX_TICK / 2`, the same
/// technique kernels use for jiffy comparisons: the difference is computed
/// modulo the tick width and interpreted as signed.
pub fn is_tick_over(reference: Tick, limit: Tick) -> bool {
    (reference.wrapping_sub(limit) as i32) >= 0
}

/// A monotonic tick source supplied by the embedding platform.
pub trait Clock: Sync {
    /// Current tick count. May wrap at [`COOP_MAX_TICK`].
    fn tick(&self) -> Tick;
}

static CLOCK: Mutex<Option<&'static dyn Clock>> = Mutex::new(None);

/// Register the platform's tick source. Must be called once before any
/// timed operation (`idle`, `wait` with a timeout, `yield_after`) is used.
pub fn set_clock(clock: &'static dyn Clock) {
    *CLOCK.lock() = Some(clock);
}

/// Current tick, or `0` if no clock has been registered yet.
pub fn now() -> Tick {
    match *CLOCK.lock() {
        Some(clock) => clock.tick(),
        None => {
            log::warn!("coop_sched: tick() called with no Clock registered");
            0
        }
    }
}
