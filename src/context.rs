//! Non-local control transfer between the scheduler and a running thread
//! (spec.md §9 "Non-local control transfer").
//!
//! This is a minimal `setjmp`/`longjmp`-style save/restore pair over the
//! x86_64 System V callee-saved registers plus the stack pointer, in the
//! same naked-`asm!` style the teacher uses for its own interrupt
//! trampolines (`scheduler/mod.rs::yield_interrupt_handler`) — the
//! difference is that here the "interrupt frame" is just a return address,
//! since the switch is a plain call, not a hardware trap.

/// A suspended execution point: the callee-saved registers and stack
/// pointer needed to resume exactly where [`save_context`] left off.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Context {
    rbx: u64,
    rbp: u64,
    r12: u64,
    r13: u64,
    r14: u64,
    r15: u64,
    rsp: u64,
    rip: u64,
}

impl Context {
    /// A zeroed, not-yet-captured context.
    pub const fn zeroed() -> Self {
        Context { rbx: 0, rbp: 0, r12: 0, r13: 0, r14: 0, r15: 0, rsp: 0, rip: 0 }
    }

    /// Build a context that, when jumped into, starts executing at
    /// `entry` on top of `stack_top` (highest address of the thread's
    /// stack buffer, 16-byte aligned).
    ///
    /// `entry` must never return to its caller in the usual sense; the
    /// trampoline it points to is expected to terminate the thread through
    /// the scheduler's own termination path instead.
    pub fn bootstrap(stack_top: *mut u8, entry: extern "C" fn() -> !) -> Self {
        // x86_64 SysV requires rsp % 16 == 0 at a `call` site, i.e. rsp % 16
        // == 8 on entry to the callee (after the `call` push). `jump_context`
        // restores rsp and `jmp`s (not `call`s), so we must present rsp as
        // if we were freshly entered: 8 mod 16.
        let aligned_top = (stack_top as u64) & !0xF;
        let rsp = aligned_top - 8;
        Context { rbx: 0, rbp: 0, r12: 0, r13: 0, r14: 0, r15: 0, rsp, rip: entry as u64 }
    }
}

unsafe extern "C" {
    /// Captures the current callee-saved registers and stack pointer into
    /// `*ctx`. Returns `0` on the direct call; returns whatever value a
    /// later [`jump_context`] passed when execution resumes here.
    pub fn save_context(ctx: *mut Context) -> i32;

    /// Restores `*ctx` and transfers control to it, passing `value` back
    /// as the apparent return value of the matching [`save_context`]. Never
    /// returns to its caller.
    pub fn jump_context(ctx: *const Context, value: i32) -> !;
}

core::arch::global_asm!(
    ".global save_context",
    "save_context:",
    "mov [rdi + 0x00], rbx",
    "mov [rdi + 0x08], rbp",
    "mov [rdi + 0x10], r12",
    "mov [rdi + 0x18], r13",
    "mov [rdi + 0x20], r14",
    "mov [rdi + 0x28], r15",
    "lea rax, [rsp + 8]",
    "mov [rdi + 0x30], rax",
    "mov rax, [rsp]",
    "mov [rdi + 0x38], rax",
    "xor eax, eax",
    "ret",
    ".global jump_context",
    "jump_context:",
    "mov eax, esi",
    "mov rbx, [rdi + 0x00]",
    "mov rbp, [rdi + 0x08]",
    "mov r12, [rdi + 0x10]",
    "mov r13, [rdi + 0x18]",
    "mov r14, [rdi + 0x20]",
    "mov r15, [rdi + 0x28]",
    "mov rsp, [rdi + 0x30]",
    "jmp qword ptr [rdi + 0x38]",
);

const _: () = assert!(core::mem::size_of::<Context>() == 0x40);
