//! Compile-time scheduler configuration.
//!
//! These mirror the constants the teacher inlines at the top of its own
//! scheduler module (`THREAD_STACK_SIZE`, `MAX_THREADS`); here they form the
//! crate's single compile-time configuration surface (§6 "Configuration").

/// Maximum number of concurrently schedulable threads (the fixed TCB pool
/// size). Compile-time constant per §5 "Maximum concurrent threads is a
/// compile-time constant."
pub const MAX_THREADS: usize = 32;

/// Stack size substituted when a caller requests `stack_sz == 0`.
pub const DEFAULT_STACK_SIZE: usize = 8 * 1024;

/// Upper bound on a requested stack size. Every pool slot statically
/// reserves a buffer of this size (see SPEC_FULL.md §2 for why per-slot
/// buffers are fixed-size rather than carved in place).
pub const MAX_STACK_SIZE: usize = 64 * 1024;
