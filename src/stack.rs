//! Stack growth for deep Lox recursion.
//!
//! Every Lox call nests several evaluator frames on the native stack, which
//! overflows long before [`MAX_CALL_DEPTH`](crate::interpreter::MAX_CALL_DEPTH)
//! on a small thread stack. `stacker` moves the work onto a fresh segment when
//! the current one runs low.

/// Minimum stack space to keep available before entering a call.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if fewer than [`RED_ZONE`] bytes remain.
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
